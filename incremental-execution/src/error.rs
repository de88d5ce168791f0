//! Error types.
//!
//! Only [`CoercionError`] and [`SpecError`] are returned to the caller. Everything that goes
//! wrong while a field executes is reported as an [`Error`] inside an `error` event of the
//! result stream instead.

use std::fmt;

use apollo_compiler::ast::OperationType;
use displaydoc::Display;
use serde::Deserialize;
use serde::Serialize;
use serde_json_bytes::ByteString;
use serde_json_bytes::Value;
use thiserror::Error;

use crate::json_ext::Object;
use crate::json_ext::Path;

/// Extension code of an error returned or thrown by a resolver.
pub const RESOLVER_ERROR: &str = "RESOLVER_ERROR";
/// Extension code of a `null` found at a non-null position.
pub const NON_NULL_VIOLATION: &str = "NON_NULL_VIOLATION";
/// Extension code of a value that cannot be completed for its declared type.
pub const INTERNAL_TYPE_ERROR: &str = "INTERNAL_TYPE_ERROR";
/// Extension code of field arguments that could not be coerced.
pub const ARGUMENT_COERCION: &str = "ARGUMENT_COERCION";
/// Extension code of a selected field that its parent type does not define.
pub const UNDEFINED_FIELD: &str = "UNDEFINED_FIELD";

/// Errors that prevent an operation from being executed at all.
///
/// Returned synchronously by [`crate::execute`]; no stream is produced.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// Must provide an operation.
    NoOperation,

    /// Unknown operation named '{name}'.
    UnknownOperation {
        /// The requested operation name.
        name: String,
    },

    /// Must provide operation name if query contains multiple operations.
    OperationNameRequired,

    /// Schema is not configured to execute {kind} operation.
    MissingRootType {
        /// The operation kind without a root type.
        kind: OperationKind,
    },

    /// Variable '${name}' of required type was not provided.
    MissingVariable {
        /// Name of the variable.
        name: String,
    },

    /// Variable '${name}' got invalid value: {reason}
    InvalidVariable {
        /// Name of the variable.
        name: String,

        /// Why the value was rejected.
        reason: String,
    },
}

/// The kind of an operation, displayed the way it is spelled in a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl From<OperationType> for OperationKind {
    fn from(operation_type: OperationType) -> Self {
        match operation_type {
            OperationType::Query => OperationKind::Query,
            OperationType::Mutation => OperationKind::Mutation,
            OperationType::Subscription => OperationKind::Subscription,
        }
    }
}

impl From<OperationKind> for OperationType {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Query => OperationType::Query,
            OperationKind::Mutation => OperationType::Mutation,
            OperationKind::Subscription => OperationType::Subscription,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        })
    }
}

/// Errors in a schema or an executable document.
#[derive(Error, Display, Debug, Clone)]
pub enum SpecError {
    /// Parsing error(s): {0}
    Parse(String),

    /// Validation error(s): {0}
    Validate(String),
}

/// A GraphQL error, as carried by `error` events and assembled responses.
#[derive(Error, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct Error {
    /// The error message.
    pub message: String,

    /// The locations of the error in the executed document.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub locations: Vec<Location>,

    /// The path of the field that failed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<Path>,

    /// The optional graphql extensions.
    #[serde(default, skip_serializing_if = "Object::is_empty")]
    pub extensions: Object,
}

impl Error {
    pub(crate) fn new(message: impl Into<String>, code: &str) -> Self {
        let mut extensions = Object::new();
        extensions.insert(ByteString::from("code"), Value::String(code.into()));
        Error {
            message: message.into(),
            extensions,
            ..Default::default()
        }
    }

    /// The `code` extension, if any.
    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(|code| code.as_str())
    }

    pub(crate) fn with_path(mut self, path: Path) -> Self {
        self.path = Some(path);
        self
    }

    pub(crate) fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }
}

/// A location in the executed document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// The line number, starting at 1.
    pub line: u32,

    /// The column number, starting at 1.
    pub column: u32,
}

/// An error produced by a field resolver.
///
/// Returning `Err(FieldError)` from a resolver, from a pending value, or as an item of a
/// resolved list yields an `error` event at the corresponding path.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("{message}")]
pub struct FieldError {
    /// The error message.
    pub message: String,

    /// Extensions copied onto the reported GraphQL error.
    pub extensions: Object,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        FieldError {
            message: message.into(),
            extensions: Object::new(),
        }
    }

    /// Adds an extension entry. A `code` given here replaces the default `RESOLVER_ERROR`.
    pub fn extension(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extensions.insert(ByteString::from(key), value.into());
        self
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::new(message)
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::new(message)
    }
}

impl From<FieldError> for Error {
    fn from(error: FieldError) -> Self {
        let mut converted = Error::new(error.message, RESOLVER_ERROR);
        for (key, value) in error.extensions {
            converted.extensions.insert(key, value);
        }
        converted
    }
}
