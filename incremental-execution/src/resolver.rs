//! Field resolvers and the values they produce.

use std::future::Future;
use std::sync::Arc;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::schema::FieldDefinition;
use derivative::Derivative;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::Context;
use crate::error::FieldError;
use crate::execution::ExecutionContext;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::ResponsePath;
use crate::json_ext::Value;
use crate::spec::Fragments;
use crate::spec::Schema;

/// What a resolver (or a pending value, or a list item) produces.
pub type FieldResult = Result<ResolvedValue, FieldError>;

/// A value produced by a resolver.
///
/// Values are either ready or pending. A pending value is awaited before it is completed
/// against the field's type, and may itself settle to any other variant.
#[derive(Derivative)]
#[derivative(Debug)]
pub enum ResolvedValue {
    /// A ready JSON value: a leaf, an object used as the source of a sub-selection, a list of
    /// plain values, or `null`.
    Value(Value),

    /// A list whose items are completed independently. An `Err` item fails only its own index.
    List(Vec<FieldResult>),

    /// A value that is not available yet.
    Pending(#[derivative(Debug = "ignore")] BoxFuture<'static, FieldResult>),
}

impl ResolvedValue {
    pub fn null() -> Self {
        ResolvedValue::Value(Value::Null)
    }

    pub fn value(value: impl Into<Value>) -> Self {
        ResolvedValue::Value(value.into())
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = FieldResult>,
    {
        ResolvedValue::List(items.into_iter().collect())
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = FieldResult> + Send + 'static,
    {
        ResolvedValue::Pending(future.boxed())
    }
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        ResolvedValue::Value(value)
    }
}

/// Produces the value of a field from its parent value and arguments.
///
/// Implemented for every `Fn(&Value, &Object, &Context, &ResolveInfo) -> FieldResult`.
pub trait FieldResolver: Send + Sync {
    fn resolve(
        &self,
        source: &Value,
        args: &Object,
        context: &Context,
        info: &ResolveInfo,
    ) -> FieldResult;
}

impl<F> FieldResolver for F
where
    F: Fn(&Value, &Object, &Context, &ResolveInfo) -> FieldResult + Send + Sync,
{
    fn resolve(
        &self,
        source: &Value,
        args: &Object,
        context: &Context,
        info: &ResolveInfo,
    ) -> FieldResult {
        (self)(source, args, context, info)
    }
}

/// Reads the property named like the field off the parent value.
///
/// Returns `null` when the parent is not an object or has no such property.
pub fn default_field_resolver(
    source: &Value,
    _args: &Object,
    _context: &Context,
    info: &ResolveInfo,
) -> FieldResult {
    Ok(ResolvedValue::Value(
        source
            .as_object()
            .and_then(|object| object.get(info.field_name().as_str()))
            .cloned()
            .unwrap_or(Value::Null),
    ))
}

/// Resolves `__typename` to the name of the parent object type.
pub(crate) fn typename_resolver(
    _source: &Value,
    _args: &Object,
    _context: &Context,
    info: &ResolveInfo,
) -> FieldResult {
    Ok(ResolvedValue::value(info.parent_type().as_str()))
}

/// What a resolver knows about the field it resolves.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ResolveInfo {
    pub(crate) field_name: Name,
    pub(crate) response_key: Name,
    pub(crate) field_nodes: Vec<Node<ast::Field>>,
    pub(crate) field_definition: Node<FieldDefinition>,
    pub(crate) parent_type: Name,
    pub(crate) path: ResponsePath,
    #[derivative(Debug = "ignore")]
    pub(crate) context: Arc<ExecutionContext>,
}

impl ResolveInfo {
    pub fn field_name(&self) -> &Name {
        &self.field_name
    }

    /// The alias of the field if it has one, its name otherwise.
    pub fn response_key(&self) -> &Name {
        &self.response_key
    }

    /// Every selection of the document that targets this response key.
    pub fn field_nodes(&self) -> &[Node<ast::Field>] {
        &self.field_nodes
    }

    pub fn field_definition(&self) -> &FieldDefinition {
        &self.field_definition
    }

    pub fn return_type(&self) -> &ast::Type {
        &self.field_definition.ty
    }

    pub fn parent_type(&self) -> &Name {
        &self.parent_type
    }

    pub fn path(&self) -> Path {
        self.path.to_path()
    }

    pub fn schema(&self) -> &Schema {
        &self.context.schema
    }

    pub fn fragments(&self) -> &Fragments {
        self.context.fragments()
    }

    pub fn root_value(&self) -> &Value {
        &self.context.root_value
    }

    pub fn operation(&self) -> &ast::OperationDefinition {
        &self.context.operation
    }

    pub fn variable_values(&self) -> &Object {
        &self.context.variable_values
    }
}
