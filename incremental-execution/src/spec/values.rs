//! Input coercion: variable values and field arguments.

use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use displaydoc::Display;
use serde_json_bytes::ByteString;
use thiserror::Error;

use crate::error::CoercionError;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::spec::Schema;

/// Arguments of a field that could not be coerced.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// Argument '{name}' of required type '{ty}' was not provided.
    Missing {
        /// Name of the argument.
        name: String,

        /// Declared type of the argument.
        ty: String,
    },

    /// Argument '{name}' has invalid value: {reason}
    Invalid {
        /// Name of the argument.
        name: String,

        /// Why the value was rejected.
        reason: String,
    },
}

/// <https://spec.graphql.org/October2021/#CoerceVariableValues()>
///
/// Returns the variables of `operation`, with defaults applied. Variables that are neither
/// provided nor defaulted are left out.
pub fn coerce_variable_values(
    schema: &Schema,
    operation: &ast::OperationDefinition,
    raw: &Object,
) -> Result<Object, CoercionError> {
    let mut coerced = Object::new();
    for definition in &operation.variables {
        let name = definition.name.as_str();
        match raw.get(name) {
            Some(Value::Null) if definition.ty.is_non_null() => {
                return Err(CoercionError::InvalidVariable {
                    name: name.to_string(),
                    reason: format!(
                        "Expected non-nullable type '{}' not to be null.",
                        definition.ty
                    ),
                });
            }
            Some(value) => {
                let value = coerce_input_value(schema, &definition.ty, value).map_err(|reason| {
                    CoercionError::InvalidVariable {
                        name: name.to_string(),
                        reason,
                    }
                })?;
                coerced.insert(ByteString::from(name), value);
            }
            None => {
                if let Some(default) = &definition.default_value {
                    let value = value_from_ast(default, &Object::new());
                    let value = coerce_input_value(schema, &definition.ty, &value).map_err(
                        |reason| CoercionError::InvalidVariable {
                            name: name.to_string(),
                            reason,
                        },
                    )?;
                    coerced.insert(ByteString::from(name), value);
                } else if definition.ty.is_non_null() {
                    return Err(CoercionError::MissingVariable {
                        name: name.to_string(),
                    });
                }
            }
        }
    }
    Ok(coerced)
}

/// <https://spec.graphql.org/October2021/#CoerceArgumentValues()>
///
/// Builds the arguments of a field from the first node selecting it. Argument literals may
/// reference variables at any depth.
pub fn coerce_argument_values(
    schema: &Schema,
    field_definition: &FieldDefinition,
    field_node: &ast::Field,
    variable_values: &Object,
) -> Result<Object, ArgumentError> {
    let mut coerced = Object::new();
    for definition in &field_definition.arguments {
        let name = definition.name.as_str();
        let provided = field_node
            .arguments
            .iter()
            .find(|argument| argument.name == definition.name)
            .and_then(|argument| match &*argument.value {
                ast::Value::Variable(variable) => variable_values.get(variable.as_str()).cloned(),
                literal => Some(value_from_ast(literal, variable_values)),
            });

        let value = match provided {
            Some(value) => value,
            None => match &definition.default_value {
                Some(default) => value_from_ast(default, variable_values),
                None if definition.ty.is_non_null() => {
                    return Err(ArgumentError::Missing {
                        name: name.to_string(),
                        ty: definition.ty.to_string(),
                    });
                }
                None => continue,
            },
        };

        if value.is_null() && definition.ty.is_non_null() {
            return Err(ArgumentError::Invalid {
                name: name.to_string(),
                reason: format!(
                    "Expected non-nullable type '{}' not to be null.",
                    definition.ty
                ),
            });
        }
        let value = coerce_input_value(schema, &definition.ty, &value).map_err(|reason| {
            ArgumentError::Invalid {
                name: name.to_string(),
                reason,
            }
        })?;
        coerced.insert(ByteString::from(name), value);
    }
    Ok(coerced)
}

/// Converts a document literal to JSON, substituting variables. Unknown variables become
/// `null`.
pub(crate) fn value_from_ast(value: &ast::Value, variable_values: &Object) -> Value {
    match value {
        ast::Value::Null => Value::Null,
        ast::Value::Enum(name) => Value::String(name.as_str().into()),
        ast::Value::Variable(name) => variable_values
            .get(name.as_str())
            .cloned()
            .unwrap_or(Value::Null),
        ast::Value::String(string) => Value::String(string.as_str().into()),
        ast::Value::Float(float) => float_value(float.try_to_f64().ok()),
        ast::Value::Int(int) => match int.as_str().parse::<i64>() {
            Ok(int) => Value::from(int),
            Err(_) => float_value(int.as_str().parse::<f64>().ok()),
        },
        ast::Value::Boolean(boolean) => Value::Bool(*boolean),
        ast::Value::List(items) => Value::Array(
            items
                .iter()
                .map(|item| value_from_ast(item, variable_values))
                .collect(),
        ),
        ast::Value::Object(fields) => {
            let mut object = Object::new();
            for (name, field) in fields {
                object.insert(
                    ByteString::from(name.as_str()),
                    value_from_ast(field, variable_values),
                );
            }
            Value::Object(object)
        }
    }
}

fn float_value(float: Option<f64>) -> Value {
    float
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// <https://spec.graphql.org/October2021/#sec-Input-Values>
///
/// Coerces a JSON value to an input type. `null` is accepted anywhere but at non-null
/// positions. A single value at a list position becomes a one-item list, and fields left out
/// of an input object take their default value.
pub(crate) fn coerce_input_value(
    schema: &Schema,
    ty: &ast::Type,
    value: &Value,
) -> Result<Value, String> {
    match (ty, value) {
        (ast::Type::NonNullNamed(_) | ast::Type::NonNullList(_), Value::Null) => {
            Err(format!("Expected non-nullable type '{ty}' not to be null."))
        }
        (_, Value::Null) => Ok(Value::Null),
        (ast::Type::NonNullList(inner) | ast::Type::List(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce_input_value(schema, inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (ast::Type::NonNullList(inner) | ast::Type::List(inner), value) => {
            Ok(Value::Array(vec![coerce_input_value(schema, inner, value)?]))
        }
        (ast::Type::NonNullNamed(name) | ast::Type::Named(name), value) => {
            coerce_named_input_value(schema, name, value)
        }
    }
}

fn coerce_named_input_value(
    schema: &Schema,
    name: &ast::NamedType,
    value: &Value,
) -> Result<Value, String> {
    let invalid = || Err(format!("{value} is not a valid '{name}'"));
    match schema.definitions().types.get(name) {
        Some(ExtendedType::Scalar(_)) => match (name.as_str(), value) {
            ("Int", Value::Number(number)) => {
                if number.as_i64().and_then(|x| i32::try_from(x).ok()).is_some() {
                    Ok(value.clone())
                } else {
                    invalid()
                }
            }
            ("Float", Value::Number(_))
            | ("String", Value::String(_))
            | ("Boolean", Value::Bool(_))
            | ("ID", Value::String(_)) => Ok(value.clone()),
            ("ID", Value::Number(number)) if number.is_i64() || number.is_u64() => {
                Ok(value.clone())
            }
            ("Int" | "Float" | "String" | "Boolean" | "ID", _) => invalid(),
            // custom scalars accept any JSON value
            _ => Ok(value.clone()),
        },
        Some(ExtendedType::Enum(definition)) => match value.as_str() {
            Some(variant) if definition.values.contains_key(variant) => Ok(value.clone()),
            _ => invalid(),
        },
        Some(ExtendedType::InputObject(definition)) => {
            let Some(object) = value.as_object() else {
                return invalid();
            };
            if let Some((key, _)) = object
                .iter()
                .find(|(key, _)| !definition.fields.contains_key(key.as_str()))
            {
                return Err(format!(
                    "Field '{}' is not defined by type '{name}'.",
                    key.as_str()
                ));
            }
            let mut coerced = Object::new();
            for (field_name, field) in &definition.fields {
                let field_value = match (object.get(field_name.as_str()), &field.default_value) {
                    (Some(field_value), _) => field_value.clone(),
                    (None, Some(default)) => value_from_ast(default, &Object::new()),
                    (None, None) if field.ty.is_non_null() => {
                        return Err(format!(
                            "Field '{field_name}' of required type '{}' was not provided.",
                            field.ty
                        ));
                    }
                    (None, None) => continue,
                };
                let field_value = coerce_input_value(schema, &field.ty, &field_value)
                    .map_err(|reason| format!("In field '{field_name}': {reason}"))?;
                coerced.insert(ByteString::from(field_name.as_str()), field_value);
            }
            Ok(Value::Object(coerced))
        }
        Some(_) | None => Err(format!("'{name}' is not an input type")),
    }
}
