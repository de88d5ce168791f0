//! Incremental GraphQL execution.
//!
//! Instead of a single response, [`execute`] returns a stream of [`ExecutionResult`] events,
//! one lifecycle per response path, so a consumer can render a response while it is being
//! resolved. [`ResponseBuilder`] folds the events back into a conventional response.

pub mod configuration;
mod context;
pub mod error;
mod execution;
pub mod json_ext;
mod resolver;
mod response;
mod result;
pub mod spec;

pub use configuration::Configuration;
pub use context::Context;
pub use error::CoercionError;
pub use error::Error;
pub use error::FieldError;
pub use error::Location;
pub use error::SpecError;
pub use execution::ExecutionContext;
pub use execution::ExecutionRequest;
pub use execution::build_execution_context;
pub use execution::execute;
pub use execution::execute_operation;
pub use json_ext::Object;
pub use json_ext::Path;
pub use json_ext::PathElement;
pub use json_ext::ResponsePath;
pub use json_ext::Value;
pub use resolver::FieldResolver;
pub use resolver::FieldResult;
pub use resolver::ResolveInfo;
pub use resolver::ResolvedValue;
pub use resolver::default_field_resolver;
pub use response::Response;
pub use response::ResponseBuilder;
pub use result::ExecutionResult;
pub use result::ExecutionResultStream;
pub use spec::Query;
pub use spec::Schema;
