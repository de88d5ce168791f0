//! GraphQL schema.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::validation::Valid;

use crate::Context;
use crate::error::SpecError;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::resolver::FieldResolver;
use crate::resolver::FieldResult;
use crate::resolver::ResolveInfo;

const TYPENAME: &str = "__typename";

/// A validated schema and the resolvers attached to its fields.
pub struct Schema {
    definitions: Valid<apollo_compiler::Schema>,
    resolvers: HashMap<(Name, Name), Arc<dyn FieldResolver>>,
}

/// The kind of a field's declared output type, as far as completion is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputType {
    /// A non-null wrapper around another output type.
    NonNull(Box<OutputType>),

    /// A list of another output type.
    List(Box<OutputType>),

    /// An object type, completed by executing a sub-selection.
    Object(Name),

    /// A scalar or an enum.
    Leaf(Name),

    /// A type this executor cannot complete: interfaces, unions, input objects and unknown
    /// names.
    Unsupported(Name),
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::NonNull(inner) => write!(f, "{inner}!"),
            OutputType::List(inner) => write!(f, "[{inner}]"),
            OutputType::Object(name) | OutputType::Leaf(name) | OutputType::Unsupported(name) => {
                f.write_str(name)
            }
        }
    }
}

impl Schema {
    /// Parses and validates a schema document.
    pub fn parse(sdl: &str) -> Result<Self, SpecError> {
        let definitions = apollo_compiler::Schema::parse_and_validate(sdl, "schema.graphql")
            .map_err(|errors| SpecError::Validate(errors.to_string()))?;
        Ok(Schema {
            definitions,
            resolvers: HashMap::new(),
        })
    }

    /// Attaches a closure resolver to `type_name.field_name`.
    ///
    /// Fields without a resolver use the execution's default resolver.
    pub fn with_resolver<F>(self, type_name: &str, field_name: &str, resolver: F) -> Self
    where
        F: Fn(&Value, &Object, &Context, &ResolveInfo) -> FieldResult + Send + Sync + 'static,
    {
        self.with_field_resolver(type_name, field_name, resolver)
    }

    /// Attaches any [`FieldResolver`] to `type_name.field_name`.
    pub fn with_field_resolver(
        mut self,
        type_name: &str,
        field_name: &str,
        resolver: impl FieldResolver + 'static,
    ) -> Self {
        match (Name::new(type_name), Name::new(field_name)) {
            (Ok(type_name), Ok(field_name)) => {
                self.resolvers.insert((type_name, field_name), Arc::new(resolver));
            }
            _ => {
                tracing::warn!(
                    "ignoring resolver attached to invalid name {type_name}.{field_name}"
                );
            }
        }
        self
    }

    /// The underlying type system definitions.
    pub fn definitions(&self) -> &Valid<apollo_compiler::Schema> {
        &self.definitions
    }

    pub(crate) fn resolver(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<&Arc<dyn FieldResolver>> {
        let (Ok(type_name), Ok(field_name)) = (Name::new(type_name), Name::new(field_name)) else {
            return None;
        };
        self.resolvers.get(&(type_name, field_name))
    }

    /// The name of the root type of an operation kind, if the schema defines one.
    pub fn root_type(&self, operation_type: ast::OperationType) -> Option<&Name> {
        self.definitions.root_operation(operation_type)
    }

    /// Looks up a field on an object type, including the `__typename` meta field.
    ///
    /// Introspection root fields are not served and look undefined.
    pub fn field_definition(
        &self,
        parent_type: &str,
        field_name: &str,
    ) -> Option<Node<FieldDefinition>> {
        if field_name.starts_with("__") && field_name != TYPENAME {
            return None;
        }
        self.definitions.get_object(parent_type)?;
        self.definitions
            .type_field(parent_type, field_name)
            .ok()
            .map(|component| component.node.clone())
    }

    /// Classifies a declared type.
    pub fn output_type(&self, ty: &ast::Type) -> OutputType {
        match ty {
            ast::Type::NonNullNamed(name) => {
                OutputType::NonNull(Box::new(self.named_output_type(name)))
            }
            ast::Type::NonNullList(inner) => {
                OutputType::NonNull(Box::new(OutputType::List(Box::new(self.output_type(inner)))))
            }
            ast::Type::List(inner) => OutputType::List(Box::new(self.output_type(inner))),
            ast::Type::Named(name) => self.named_output_type(name),
        }
    }

    fn named_output_type(&self, name: &Name) -> OutputType {
        match self.definitions.types.get(name) {
            Some(ExtendedType::Scalar(_)) | Some(ExtendedType::Enum(_)) => {
                OutputType::Leaf(name.clone())
            }
            Some(ExtendedType::Object(_)) => OutputType::Object(name.clone()),
            Some(ExtendedType::Interface(_))
            | Some(ExtendedType::Union(_))
            | Some(ExtendedType::InputObject(_))
            | None => OutputType::Unsupported(name.clone()),
        }
    }

    /// True if a fragment with `type_condition` applies to values of `object_type`.
    ///
    /// The condition applies if it names the object type itself, an interface the object
    /// implements, or a union the object belongs to.
    pub fn does_fragment_type_apply(&self, object_type: &str, type_condition: &str) -> bool {
        if object_type == type_condition {
            return true;
        }
        match self.definitions.types.get(type_condition) {
            Some(ExtendedType::Interface(_)) => self
                .definitions
                .get_object(object_type)
                .is_some_and(|object| {
                    object
                        .implements_interfaces
                        .iter()
                        .any(|interface| interface.name.as_str() == type_condition)
                }),
            Some(ExtendedType::Union(union_)) => union_
                .members
                .iter()
                .any(|member| member.name.as_str() == object_type),
            _ => false,
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("types", &self.definitions.types.len())
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}
