use std::collections::HashSet;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use indexmap::IndexMap;

use crate::spec::Fragments;
use crate::spec::Schema;

/// Field selections grouped by response key, in document order.
pub type FieldGroup = IndexMap<Name, Vec<Node<ast::Field>>>;

/// <https://spec.graphql.org/October2021/#CollectFields()>
///
/// Adds the fields of `selection_set` that apply to `object_type` to `fields`. Fragment
/// spreads are expanded at most once per walk (tracked in `visited_fragments`) and unknown
/// fragments are skipped. Directives are not evaluated.
pub fn collect_fields(
    schema: &Schema,
    fragments: &Fragments,
    object_type: &str,
    selection_set: &[ast::Selection],
    fields: &mut FieldGroup,
    visited_fragments: &mut HashSet<Name>,
) {
    for selection in selection_set {
        match selection {
            ast::Selection::Field(field) => {
                let response_key = field.alias.as_ref().unwrap_or(&field.name);
                fields
                    .entry(response_key.clone())
                    .or_default()
                    .push(field.clone());
            }
            ast::Selection::FragmentSpread(spread) => {
                if !visited_fragments.insert(spread.fragment_name.clone()) {
                    continue;
                }
                let Some(fragment) = fragments.get(&spread.fragment_name) else {
                    tracing::debug!(
                        fragment = %spread.fragment_name,
                        "skipping spread of unknown fragment"
                    );
                    continue;
                };
                if !schema.does_fragment_type_apply(object_type, &fragment.type_condition) {
                    continue;
                }
                collect_fields(
                    schema,
                    fragments,
                    object_type,
                    &fragment.selection_set,
                    fields,
                    visited_fragments,
                );
            }
            ast::Selection::InlineFragment(inline) => {
                if let Some(condition) = &inline.type_condition {
                    if !schema.does_fragment_type_apply(object_type, condition) {
                        continue;
                    }
                }
                collect_fields(
                    schema,
                    fragments,
                    object_type,
                    &inline.selection_set,
                    fields,
                    visited_fragments,
                );
            }
        }
    }
}

/// Collects the sub-selections of every node targeting one response key into a single group.
pub(crate) fn collect_subfields(
    schema: &Schema,
    fragments: &Fragments,
    object_type: &str,
    field_nodes: &[Node<ast::Field>],
) -> FieldGroup {
    let mut fields = FieldGroup::new();
    let mut visited_fragments = HashSet::new();
    for node in field_nodes {
        collect_fields(
            schema,
            fragments,
            object_type,
            &node.selection_set,
            &mut fields,
            &mut visited_fragments,
        );
    }
    fields
}
