use incremental_execution::ExecutionResult;
use incremental_execution::FieldError;
use incremental_execution::Path;
use incremental_execution::ResolvedValue;
use incremental_execution::Schema;
use incremental_execution::error::NON_NULL_VIOLATION;
use incremental_execution::error::RESOLVER_ERROR;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json_bytes::json;

mod common;

use common::*;

const SCHEMA: &str = r#"
    type Item {
        name: String!
        tags: [String!]
    }

    type Query {
        required: String!
        optional: String
        failing: String
        numbers: [Int]
        item: Item
        items: [Item]
    }
"#;

fn schema(failing_index: usize) -> Schema {
    Schema::parse(SCHEMA)
        .unwrap()
        .with_resolver("Query", "required", |_, _, _, _| Ok(ResolvedValue::null()))
        .with_resolver("Query", "optional", |_, _, _, _| {
            Ok(ResolvedValue::value("here"))
        })
        .with_resolver("Query", "failing", |_, _, _, _| Err(FieldError::new("boom")))
        .with_resolver("Query", "numbers", move |_, _, _, _| {
            Ok(ResolvedValue::list((0..10).map(move |index: usize| {
                if index == failing_index {
                    Err(FieldError::new(format!("no number {index}")))
                } else {
                    Ok(ResolvedValue::value(json!(index)))
                }
            })))
        })
        .with_resolver("Query", "item", |_, _, _, _| {
            Ok(ResolvedValue::value(json!({ "name": null, "tags": ["a", null] })))
        })
        .with_resolver("Query", "items", |_, _, _, _| {
            Ok(ResolvedValue::value(json!([
                { "name": "first", "tags": [] },
                null,
                { "name": "third", "tags": ["c"] }
            ])))
        })
}

fn error_codes(events: &[&ExecutionResult]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ExecutionResult::Error { errors, .. } => Some(errors),
            _ => None,
        })
        .flatten()
        .filter_map(|error| error.code().map(str::to_string))
        .collect()
}

#[test_log::test(tokio::test)]
async fn every_path_has_one_lifecycle() {
    let events = run(
        schema(4),
        "{ required optional failing numbers item { name tags } items { name tags } }",
    )
    .await;

    assert_lifecycles(&events);
}

#[test_log::test(tokio::test)]
async fn blog_paths_have_one_lifecycle() {
    assert_lifecycles(&run(blog_schema(), BLOG_QUERY).await);
}

#[test_log::test(tokio::test)]
async fn a_field_starts_before_and_completes_after_its_children() {
    let events = run(blog_schema(), r#"{ article(id: "7") { author { name } } }"#).await;
    let position = |event: ExecutionResult| events.iter().position(|e| e == &event).unwrap();

    assert!(position(init("article")) < position(init("article/author")));
    assert!(position(init("article/author")) < position(init("article/author/name")));
    assert!(position(complete("article/author/name")) < position(complete("article/author")));
    assert!(position(complete("article/author")) < position(complete("article")));
    assert_eq!(events.last(), Some(&complete("article")));
}

#[test_log::test(tokio::test)]
async fn null_at_a_non_null_field_is_an_error() {
    let events = run(schema(0), "{ required }").await;

    let required = events_at(&events, "required");
    assert_eq!(required.len(), 3);
    assert!(required[0].is_init());
    assert!(required[2].is_complete());
    assert_eq!(error_codes(&required), vec![NON_NULL_VIOLATION.to_string()]);
    match required[1] {
        ExecutionResult::Error { errors, .. } => {
            assert_eq!(
                errors[0].message,
                "Cannot return null for non-nullable field Query.required."
            );
            assert_eq!(errors[0].path, Some(Path::from("required")));
        }
        other => panic!("expected an error, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn non_null_violations_stay_local() {
    let events = run(schema(0), "{ item { name tags } }").await;

    let name = events_at(&events, "item/name");
    assert_eq!(error_codes(&name), vec![NON_NULL_VIOLATION.to_string()]);
    assert!(
        !name
            .iter()
            .any(|event| matches!(event, ExecutionResult::Data { .. }))
    );

    assert_eq!(events_at(&events, "item/tags/0"), vec![&data("item/tags/0", json!("a"))]);
    assert_eq!(
        error_codes(&events_at(&events, "item/tags/1")),
        vec![NON_NULL_VIOLATION.to_string()]
    );
    assert_eq!(events_at(&events, "item"), vec![&init("item"), &complete("item")]);
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(9)]
#[tokio::test]
async fn a_failing_list_item_is_isolated(#[case] failing_index: usize) {
    let events = run(schema(failing_index), "{ numbers }").await;

    assert_eq!(events.len(), 12);
    assert_eq!(events.first(), Some(&init("numbers")));
    assert_eq!(events.last(), Some(&complete("numbers")));
    for index in 0..10 {
        let path = format!("numbers/{index}");
        let item = events_at(&events, &path);
        if index == failing_index {
            assert_eq!(error_codes(&item), vec![RESOLVER_ERROR.to_string()]);
        } else {
            assert_eq!(item, vec![&data(&path, json!(index))]);
        }
    }
}

#[test_log::test(tokio::test)]
async fn null_list_items_complete_as_null() {
    let events = run(schema(0), "{ items { name } }").await;

    assert_eq!(events_at(&events, "items/1"), vec![&data("items/1", json!(null))]);
    assert_eq!(
        events_at(&events, "items/2/name"),
        leaf("items/2/name", json!("third")).iter().collect::<Vec<_>>()
    );
    assert_lifecycles(&events);
}

#[test_log::test(tokio::test)]
async fn a_failing_sibling_does_not_affect_the_others() {
    let events = run(schema(0), "{ failing optional }").await;

    assert_eq!(
        events_at(&events, "optional"),
        leaf("optional", json!("here")).iter().collect::<Vec<_>>()
    );
    let failing = events_at(&events, "failing");
    assert_eq!(failing.len(), 3);
    assert_eq!(error_codes(&failing), vec![RESOLVER_ERROR.to_string()]);
    assert_eq!(events.len(), 6);
}

#[test_log::test(tokio::test)]
async fn reruns_produce_the_same_events() {
    let query = "{ required optional failing numbers item { name tags } items { name tags } }";
    let first = run(schema(2), query).await;
    let second = run(schema(2), query).await;

    assert_eq!(sorted(&first), sorted(&second));
    assert_eq!(
        sorted(&run(blog_schema(), BLOG_QUERY).await),
        sorted(&run(blog_schema(), BLOG_QUERY).await)
    );
}
