use std::sync::Arc;

use apollo_compiler::Node;
use apollo_compiler::ast;
use futures::StreamExt;
use futures::future;
use futures::stream;

use super::ExecutionContext;
use super::field::execute_fields;
use super::merge::merge;
use crate::error::Error;
use crate::error::FieldError;
use crate::error::INTERNAL_TYPE_ERROR;
use crate::error::NON_NULL_VIOLATION;
use crate::json_ext::ResponsePath;
use crate::json_ext::Value;
use crate::resolver::FieldResult;
use crate::resolver::ResolveInfo;
use crate::resolver::ResolvedValue;
use crate::result::ExecutionResult;
use crate::result::ExecutionResultStream;
use crate::spec::OutputType;
use crate::spec::collect_subfields;

/// A resolved value that is no longer pending.
enum Settled {
    Value(Value),
    List(Vec<FieldResult>),
}

async fn settle(mut result: FieldResult) -> Result<Settled, FieldError> {
    loop {
        match result? {
            ResolvedValue::Pending(pending) => result = pending.await,
            ResolvedValue::Value(value) => return Ok(Settled::Value(value)),
            ResolvedValue::List(items) => return Ok(Settled::List(items)),
        }
    }
}

/// <https://spec.graphql.org/October2021/#CompleteValue()>
///
/// Waits for `result` to settle, then produces the events of the value at `path`. Ready and
/// pending values go through the same suspension point.
pub(super) fn complete_value(
    info: Arc<ResolveInfo>,
    return_type: OutputType,
    path: ResponsePath,
    result: FieldResult,
) -> ExecutionResultStream {
    stream::once(settle(result))
        .map(move |settled| complete_settled(&info, &return_type, &path, settled))
        .flatten()
        .boxed()
}

fn complete_settled(
    info: &Arc<ResolveInfo>,
    return_type: &OutputType,
    path: &ResponsePath,
    settled: Result<Settled, FieldError>,
) -> ExecutionResultStream {
    let context = &info.context;
    let settled = match settled {
        Ok(settled) => settled,
        Err(error) => return report_error(context, &info.field_nodes, path, error.into()),
    };

    match (return_type, settled) {
        (OutputType::NonNull(_), Settled::Value(Value::Null)) => report_error(
            context,
            &info.field_nodes,
            path,
            Error::new(
                format!(
                    "Cannot return null for non-nullable field {}.{}.",
                    info.parent_type, info.field_name
                ),
                NON_NULL_VIOLATION,
            ),
        ),
        (OutputType::NonNull(inner), settled) => complete_settled(info, inner, path, Ok(settled)),
        (_, Settled::Value(Value::Null)) => data(path, Value::Null),

        (OutputType::List(inner), Settled::Value(Value::Array(items))) => {
            merge(items.into_iter().enumerate().map(|(index, item)| {
                complete_value(
                    info.clone(),
                    inner.as_ref().clone(),
                    path.push(index),
                    Ok(ResolvedValue::Value(item)),
                )
            }))
        }
        (OutputType::List(inner), Settled::List(items)) => {
            merge(items.into_iter().enumerate().map(|(index, item)| {
                complete_value(info.clone(), inner.as_ref().clone(), path.push(index), item)
            }))
        }
        (OutputType::List(_), Settled::Value(_)) => report_error(
            context,
            &info.field_nodes,
            path,
            Error::new(
                format!(
                    "Expected a list, but did not find one for field {}.{}.",
                    info.parent_type, info.field_name
                ),
                INTERNAL_TYPE_ERROR,
            ),
        ),

        (OutputType::Object(type_name), Settled::Value(source @ Value::Object(_))) => {
            let fields = collect_subfields(
                &context.schema,
                context.fragments(),
                type_name,
                &info.field_nodes,
            );
            execute_fields(context, type_name, &source, path, fields)
        }
        (OutputType::Object(type_name), _) => report_error(
            context,
            &info.field_nodes,
            path,
            Error::new(
                format!(
                    "Expected an object of type \"{type_name}\" for field {}.{}.",
                    info.parent_type, info.field_name
                ),
                INTERNAL_TYPE_ERROR,
            ),
        ),

        (OutputType::Leaf(_), Settled::Value(value)) => data(path, value),
        (OutputType::Leaf(type_name), Settled::List(_)) => report_error(
            context,
            &info.field_nodes,
            path,
            Error::new(
                format!(
                    "Expected a value of type \"{type_name}\" but received a list for field {}.{}.",
                    info.parent_type, info.field_name
                ),
                INTERNAL_TYPE_ERROR,
            ),
        ),

        (OutputType::Unsupported(type_name), _) => report_error(
            context,
            &info.field_nodes,
            path,
            Error::new(
                format!("Cannot complete value of unexpected type \"{type_name}\"."),
                INTERNAL_TYPE_ERROR,
            ),
        ),
    }
}

fn data(path: &ResponsePath, value: Value) -> ExecutionResultStream {
    stream::once(future::ready(ExecutionResult::Data {
        path: path.to_path(),
        value,
    }))
    .boxed()
}

/// Records `error` against `path` and emits it.
pub(super) fn report_error(
    context: &ExecutionContext,
    field_nodes: &[Node<ast::Field>],
    path: &ResponsePath,
    error: Error,
) -> ExecutionResultStream {
    let path = path.to_path();
    let error = error.with_path(path.clone()).with_locations(
        field_nodes
            .first()
            .and_then(|node| context.query.location(node))
            .into_iter()
            .collect(),
    );
    tracing::debug!(%path, code = ?error.code(), "{}", error.message);
    context.push_error(error.clone());
    stream::once(future::ready(ExecutionResult::Error {
        path,
        errors: vec![error],
    }))
    .boxed()
}
