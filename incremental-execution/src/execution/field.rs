use std::sync::Arc;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use futures::StreamExt;
use futures::future;
use futures::stream;

use super::ExecutionContext;
use super::completion;
use super::merge::merge;
use crate::configuration::UndefinedFields;
use crate::error::ARGUMENT_COERCION;
use crate::error::Error;
use crate::error::UNDEFINED_FIELD;
use crate::json_ext::ResponsePath;
use crate::json_ext::Value;
use crate::resolver::FieldResolver;
use crate::resolver::ResolveInfo;
use crate::resolver::typename_resolver;
use crate::result::ExecutionResult;
use crate::result::ExecutionResultStream;
use crate::spec::FieldGroup;
use crate::spec::coerce_argument_values;

/// Executes the fields of one object value concurrently.
pub(super) fn execute_fields(
    context: &Arc<ExecutionContext>,
    parent_type: &Name,
    source: &Value,
    path: &ResponsePath,
    fields: FieldGroup,
) -> ExecutionResultStream {
    merge(fields.into_iter().map(|(response_key, field_nodes)| {
        let field_path = path.push(response_key.as_str());
        execute_field(context, parent_type, source, response_key, field_nodes, field_path)
    }))
}

/// Executes the fields of one object value one after the other.
///
/// A field is resolved only once the stream of the previous one has ended.
pub(super) fn execute_fields_serially(
    context: Arc<ExecutionContext>,
    parent_type: Name,
    source: Value,
    path: ResponsePath,
    fields: FieldGroup,
) -> ExecutionResultStream {
    stream::iter(fields)
        .flat_map(move |(response_key, field_nodes)| {
            let field_path = path.push(response_key.as_str());
            execute_field(
                &context,
                &parent_type,
                &source,
                response_key,
                field_nodes,
                field_path,
            )
        })
        .boxed()
}

/// Resolves one response key and completes its value.
///
/// The resolver is invoked right away; the returned stream starts with `init` and ends with
/// `complete`.
fn execute_field(
    context: &Arc<ExecutionContext>,
    parent_type: &Name,
    source: &Value,
    response_key: Name,
    field_nodes: Vec<Node<ast::Field>>,
    path: ResponsePath,
) -> ExecutionResultStream {
    let Some(first) = field_nodes.first().cloned() else {
        return stream::empty().boxed();
    };
    let field_name = first.name.clone();

    let Some(field_definition) = context.schema.field_definition(parent_type, &field_name) else {
        return undefined_field(context, parent_type, &field_nodes, &path);
    };
    tracing::trace!(%path, %parent_type, field = %field_name, "executing field");

    let resolver: &dyn FieldResolver = match context.schema.resolver(parent_type, &field_name) {
        Some(resolver) => resolver.as_ref(),
        None if field_name.as_str() == "__typename" => &typename_resolver,
        None => context.field_resolver.as_ref(),
    };
    let return_type = context.schema.output_type(&field_definition.ty);
    let info = Arc::new(ResolveInfo {
        field_name,
        response_key,
        field_nodes,
        field_definition,
        parent_type: parent_type.clone(),
        path: path.clone(),
        context: context.clone(),
    });

    let body = match coerce_argument_values(
        &context.schema,
        &info.field_definition,
        &first,
        &context.variable_values,
    ) {
        Ok(args) => {
            let resolved = resolver.resolve(source, &args, &context.context, &info);
            completion::complete_value(info, return_type, path.clone(), resolved)
        }
        Err(error) => completion::report_error(
            context,
            &info.field_nodes,
            &path,
            Error::new(error.to_string(), ARGUMENT_COERCION),
        ),
    };

    with_lifecycle(&path, body)
}

/// A selection of a field the parent type does not define.
fn undefined_field(
    context: &ExecutionContext,
    parent_type: &Name,
    field_nodes: &[Node<ast::Field>],
    path: &ResponsePath,
) -> ExecutionResultStream {
    let field_name = field_nodes
        .first()
        .map(|node| node.name.as_str())
        .unwrap_or_default();
    match context.configuration.undefined_fields {
        UndefinedFields::Ignore => {
            tracing::debug!(%path, %parent_type, field = field_name, "skipping undefined field");
            stream::empty().boxed()
        }
        UndefinedFields::Error => with_lifecycle(
            path,
            completion::report_error(
                context,
                field_nodes,
                path,
                Error::new(
                    format!("Cannot query field \"{field_name}\" on type \"{parent_type}\"."),
                    UNDEFINED_FIELD,
                ),
            ),
        ),
    }
}

fn with_lifecycle(path: &ResponsePath, body: ExecutionResultStream) -> ExecutionResultStream {
    let path = path.to_path();
    stream::once(future::ready(ExecutionResult::Init { path: path.clone() }))
        .chain(body)
        .chain(stream::once(future::ready(ExecutionResult::Complete {
            path,
        })))
        .boxed()
}
