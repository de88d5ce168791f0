//! Incremental execution of an operation.
//!
//! [`execute`] walks the selection tree of an operation and returns a stream of
//! [`ExecutionResult`](crate::ExecutionResult)s: each field announces itself with `init`,
//! produces `data` or `error` (or the events of its sub-fields), and closes with `complete`.
//! Sibling fields and list items are executed independently and their streams are merged as
//! they make progress.

mod completion;
mod field;
mod merge;

use std::sync::Arc;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use derivative::Derivative;
use futures::StreamExt;
use parking_lot::Mutex;
use tracing_futures::Instrument;
use typed_builder::TypedBuilder;

use crate::Context;
use crate::configuration::Configuration;
use crate::configuration::MutationExecution;
use crate::error::CoercionError;
use crate::error::Error;
use crate::error::OperationKind;
use crate::json_ext::Object;
use crate::json_ext::ResponsePath;
use crate::json_ext::Value;
use crate::resolver::FieldResolver;
use crate::resolver::default_field_resolver;
use crate::result::ExecutionResultStream;
use crate::spec::FieldGroup;
use crate::spec::Fragments;
use crate::spec::Query;
use crate::spec::Schema;
use crate::spec::coerce_variable_values;
use crate::spec::collect_fields;

/// Everything one execution needs, shared by all of its fields.
///
/// Only the error list changes once execution has started.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ExecutionContext {
    pub(crate) schema: Arc<Schema>,
    pub(crate) query: Arc<Query>,
    pub(crate) root_value: Value,
    pub(crate) context: Context,
    pub(crate) operation: Node<ast::OperationDefinition>,
    pub(crate) root_type: Name,
    pub(crate) variable_values: Object,
    #[derivative(Debug = "ignore")]
    pub(crate) field_resolver: Arc<dyn FieldResolver>,
    pub(crate) configuration: Configuration,
    errors: Mutex<Vec<Error>>,
}

impl ExecutionContext {
    pub fn fragments(&self) -> &Fragments {
        self.query.fragments()
    }

    pub fn operation_kind(&self) -> OperationKind {
        self.operation.operation_type.into()
    }

    /// The errors reported so far, in the order they were emitted.
    pub fn errors(&self) -> Vec<Error> {
        self.errors.lock().clone()
    }

    pub(crate) fn push_error(&self, error: Error) {
        self.errors.lock().push(error);
    }
}

/// The inputs of one execution.
#[derive(TypedBuilder, Derivative)]
#[derivative(Debug)]
pub struct ExecutionRequest {
    #[builder(setter(into))]
    schema: Arc<Schema>,

    /// The executable document.
    #[builder(setter(into))]
    document: Arc<Query>,

    /// The source value of the root fields.
    #[builder(default = Value::Null)]
    root_value: Value,

    /// Passed to every resolver.
    #[builder(default)]
    context: Context,

    /// Raw variable values, coerced against the operation's variable definitions.
    #[builder(default)]
    variable_values: Object,

    /// Required when the document contains several operations.
    #[builder(default, setter(into, strip_option))]
    operation_name: Option<String>,

    /// Resolves fields that have no resolver of their own. Defaults to
    /// [`default_field_resolver`].
    #[builder(default, setter(strip_option))]
    #[derivative(Debug = "ignore")]
    field_resolver: Option<Arc<dyn FieldResolver>>,

    #[builder(default)]
    configuration: Configuration,
}

/// Selects the operation, finds its root type and coerces the variables.
pub fn build_execution_context(
    request: ExecutionRequest,
) -> Result<ExecutionContext, CoercionError> {
    let ExecutionRequest {
        schema,
        document,
        root_value,
        context,
        variable_values,
        operation_name,
        field_resolver,
        configuration,
    } = request;

    let operation = document.operation(operation_name.as_deref())?.clone();
    let kind = OperationKind::from(operation.operation_type);
    let root_type = schema
        .root_type(operation.operation_type)
        .cloned()
        .ok_or(CoercionError::MissingRootType { kind })?;
    let variable_values = coerce_variable_values(&schema, &operation, &variable_values)?;

    Ok(ExecutionContext {
        schema,
        query: document,
        root_value,
        context,
        operation,
        root_type,
        variable_values,
        field_resolver: field_resolver.unwrap_or_else(|| Arc::new(default_field_resolver)),
        configuration,
        errors: Mutex::new(Vec::new()),
    })
}

/// Executes an operation.
///
/// Fails without producing a stream if the operation cannot be selected or its variables cannot
/// be coerced. Everything that goes wrong afterwards is reported on the stream. Dropping the
/// stream stops the execution.
pub fn execute(request: ExecutionRequest) -> Result<ExecutionResultStream, CoercionError> {
    let context = build_execution_context(request).inspect_err(|error| {
        tracing::debug!(%error, "cannot execute operation");
    })?;
    Ok(execute_operation(Arc::new(context)))
}

/// Executes the operation of an already built context.
///
/// The errors reported on the stream are also collected in the context.
pub fn execute_operation(context: Arc<ExecutionContext>) -> ExecutionResultStream {
    let kind = context.operation_kind();
    let span = tracing::info_span!(
        "graphql.execute",
        graphql.operation.name = context
            .operation
            .name
            .as_ref()
            .map(|name| name.as_str())
            .unwrap_or_default(),
        graphql.operation.kind = %kind,
    );

    let mut fields = FieldGroup::new();
    span.in_scope(|| {
        collect_fields(
            &context.schema,
            context.fragments(),
            &context.root_type,
            &context.operation.selection_set,
            &mut fields,
            &mut Default::default(),
        )
    });

    let serial = kind == OperationKind::Mutation
        && context.configuration.mutations == MutationExecution::Serial;
    let root_type = context.root_type.clone();
    let root_value = context.root_value.clone();
    let stream = span.in_scope(|| {
        if serial {
            field::execute_fields_serially(
                context,
                root_type,
                root_value,
                ResponsePath::root(),
                fields,
            )
        } else {
            field::execute_fields(&context, &root_type, &root_value, &ResponsePath::root(), fields)
        }
    });

    stream.instrument(span).boxed()
}
