use std::collections::HashSet;

use futures::StreamExt;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::json_ext::Object;
use crate::json_ext::Path;
use crate::json_ext::Value;
use crate::json_ext::ValueExt;
use crate::result::ExecutionResult;
use crate::result::ExecutionResultStream;

/// A GraphQL response assembled from the events of an execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The response data.
    pub data: Value,

    /// The errors reported during execution.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<Error>,
}

impl Response {
    /// Drains an execution stream into a response.
    pub async fn from_stream(mut stream: ExecutionResultStream) -> Response {
        let mut builder = ResponseBuilder::new();
        while let Some(event) = stream.next().await {
            builder.push(event);
        }
        builder.build()
    }
}

/// Folds execution events into response data, one event at a time.
///
/// The data can be read at any point to render a partial response. A field is `null` from its
/// `init` until its value arrives.
#[derive(Clone, Debug)]
pub struct ResponseBuilder {
    data: Value,
    errors: Vec<Error>,
    open: HashSet<Path>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        ResponseBuilder {
            data: Value::Object(Object::new()),
            errors: Vec::new(),
            open: HashSet::new(),
        }
    }
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ExecutionResult) {
        match event {
            ExecutionResult::Init { path } => {
                if self.data.get_at_path(&path).is_none() {
                    self.data.insert_at_path(&path, Value::Null);
                }
                self.open.insert(path);
            }
            ExecutionResult::Data { path, value } => {
                self.data.insert_at_path(&path, value);
            }
            ExecutionResult::Error { path, errors } => {
                self.data.insert_at_path(&path, Value::Null);
                self.errors.extend(errors);
            }
            ExecutionResult::Complete { path } => {
                self.open.remove(&path);
            }
        }
    }

    /// The data received so far.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Paths that have started but not completed yet.
    pub fn open_paths(&self) -> impl Iterator<Item = &Path> {
        self.open.iter()
    }

    /// True once every started path has completed.
    pub fn is_complete(&self) -> bool {
        self.open.is_empty()
    }

    pub fn build(self) -> Response {
        Response {
            data: self.data,
            errors: self.errors,
        }
    }
}
