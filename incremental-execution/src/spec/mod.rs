//! The type system side of execution: schema, documents, field collection and input coercion.

mod query;
mod schema;
mod selection;
mod values;

pub use query::Fragments;
pub use query::Query;
pub use schema::OutputType;
pub use schema::Schema;
pub use selection::FieldGroup;
pub use selection::collect_fields;
pub(crate) use selection::collect_subfields;
pub use values::ArgumentError;
pub use values::coerce_argument_values;
pub use values::coerce_variable_values;
