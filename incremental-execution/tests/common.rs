#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use incremental_execution::ExecutionRequest;
use incremental_execution::ExecutionResult;
use incremental_execution::Path;
use incremental_execution::PathElement;
use incremental_execution::Query;
use incremental_execution::ResolvedValue;
use incremental_execution::Schema;
use incremental_execution::Value;
use incremental_execution::execute;
use serde_json_bytes::json;

pub const BLOG_SCHEMA: &str = r#"
    type Image {
        url: String
        width: Int
        height: Int
    }

    type Author {
        id: String
        name: String
        pic(width: Int, height: Int): Image
        recentArticle: Article
    }

    type Article {
        id: String!
        isPublished: Boolean
        author: Author
        title: String
        body: String
        keywords: [String]
    }

    type Query {
        article(id: ID): Article
        feed: [Article]
    }
"#;

pub const BLOG_QUERY: &str = r#"
    {
        feed {
            id,
            title
        },
        article(id: "1") {
            ...articleFields,
            author {
                id,
                name,
                pic(width: 640, height: 480) {
                    url,
                    width,
                    height
                },
                recentArticle {
                    ...articleFields,
                    keywords
                }
            }
        }
    }

    fragment articleFields on Article {
        id,
        isPublished,
        title,
        body,
        hidden,
        notdefined
    }
"#;

fn article_fields(id: Value) -> Value {
    let title = format!("My Article {}", display(&id));
    json!({
        "id": id,
        "isPublished": true,
        "title": title,
        "body": "This is a post",
        "hidden": "This data is not exposed in the schema",
        "keywords": ["foo", "bar"]
    })
}

/// Renders a scalar the way string interpolation would.
fn display(value: &Value) -> String {
    match value {
        Value::String(string) => string.as_str().to_string(),
        other => serde_json::to_string(other).unwrap(),
    }
}

/// An article whose author's recent article is article 1.
pub fn article(id: Value) -> Value {
    let mut article = article_fields(id);
    if let Value::Object(object) = &mut article {
        object.insert("author", john_smith());
    }
    article
}

fn john_smith() -> Value {
    json!({
        "id": 123,
        "name": "John Smith",
        "recentArticle": article_fields(json!(1))
    })
}

pub fn blog_schema() -> Schema {
    Schema::parse(BLOG_SCHEMA)
        .unwrap()
        .with_resolver("Query", "article", |_, args, _, _| {
            Ok(ResolvedValue::value(article(
                args.get("id").cloned().unwrap_or(Value::Null),
            )))
        })
        .with_resolver("Query", "feed", |_, _, _, _| {
            Ok(ResolvedValue::value(Value::Array(
                (1..=10).map(|id| article(json!(id))).collect(),
            )))
        })
        .with_resolver("Author", "pic", |source, args, _, _| {
            let uid = source
                .as_object()
                .and_then(|author| author.get("id"))
                .map(display).unwrap_or_default();
            let width = args.get("width").map(display).unwrap_or_default();
            Ok(ResolvedValue::value(json!({
                "url": format!("cdn://{uid}"),
                "width": width,
                "height": args.get("height").cloned().unwrap_or(Value::Null),
            })))
        })
}

/// Executes `query` and collects every event.
pub async fn run(schema: impl Into<Arc<Schema>>, query: &str) -> Vec<ExecutionResult> {
    let request = ExecutionRequest::builder()
        .schema(schema)
        .document(Query::parse(query).unwrap())
        .build();
    collect(request).await
}

pub async fn collect(request: ExecutionRequest) -> Vec<ExecutionResult> {
    execute(request).unwrap().collect().await
}

pub fn init(path: &str) -> ExecutionResult {
    ExecutionResult::Init {
        path: Path::from(path),
    }
}

pub fn data(path: &str, value: Value) -> ExecutionResult {
    ExecutionResult::Data {
        path: Path::from(path),
        value,
    }
}

pub fn complete(path: &str) -> ExecutionResult {
    ExecutionResult::Complete {
        path: Path::from(path),
    }
}

/// `init`, `data` and `complete` of a leaf field.
pub fn leaf(path: &str, value: Value) -> Vec<ExecutionResult> {
    vec![init(path), data(path, value), complete(path)]
}

/// Events in a canonical order, for comparisons that ignore interleaving.
pub fn sorted(events: &[ExecutionResult]) -> Vec<String> {
    let mut events: Vec<String> = events
        .iter()
        .map(|event| serde_json::to_string(event).unwrap())
        .collect();
    events.sort();
    events
}

pub fn events_at<'a>(events: &'a [ExecutionResult], path: &str) -> Vec<&'a ExecutionResult> {
    let path = Path::from(path);
    events.iter().filter(|event| event.path() == &path).collect()
}

/// Checks the lifecycle of every path of a stream.
///
/// A field path has exactly one `init`, first, and one `complete`, last, after every event
/// below it. In between it has a single `data` or `error`, or only events below it. A list
/// item path has no lifecycle of its own: a single `data` or `error`, or only events below it.
pub fn assert_lifecycles(events: &[ExecutionResult]) {
    let mut by_path: HashMap<&Path, Vec<usize>> = HashMap::new();
    for (index, event) in events.iter().enumerate() {
        by_path.entry(event.path()).or_default().push(index);
    }

    for (path, indexes) in &by_path {
        let own: Vec<&ExecutionResult> = indexes.iter().map(|index| &events[*index]).collect();
        let values = own
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    ExecutionResult::Data { .. } | ExecutionResult::Error { .. }
                )
            })
            .count();
        let first_below = events
            .iter()
            .position(|event| is_strictly_below(event.path(), path));
        let last_below = events
            .iter()
            .rposition(|event| is_strictly_below(event.path(), path));

        match path.last() {
            Some(PathElement::Key(_)) => {
                assert_eq!(own.len(), values + 2, "events at {path}: {own:?}");
                assert!(own[0].is_init(), "first event at {path}: {:?}", own[0]);
                assert!(own[own.len() - 1].is_complete(), "last event at {path}");
                assert!(values <= 1, "several values at {path}");
                let (init, complete) = (indexes[0], indexes[indexes.len() - 1]);
                if let (Some(first), Some(last)) = (first_below, last_below) {
                    assert_eq!(values, 0, "{path} has a value and events below it");
                    assert!(init < first, "{path} started after its children");
                    assert!(last < complete, "{path} completed before its children");
                }
            }
            _ => {
                assert_eq!(own.len(), values, "list item {path} has a lifecycle: {own:?}");
                assert!(values == 1 || first_below.is_some(), "empty item at {path}");
                assert!(values == 0 || first_below.is_none(), "{path} has both");
            }
        }
    }
}

fn is_strictly_below(path: &Path, ancestor: &Path) -> bool {
    path.len() > ancestor.len() && ancestor.is_prefix_of(path)
}
