use std::pin::Pin;

use futures::Stream;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::json_ext::Path;
use crate::json_ext::Value;

/// One lifecycle event of the value at a response path.
///
/// For a given path, `init` comes first, `complete` comes last, and in between there is either
/// a single `data`, a single `error`, or the events of the paths below it. Events of different
/// paths are interleaved in no particular order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExecutionResult {
    /// The field at `path` started resolving.
    Init { path: Path },

    /// A leaf value, or `null`, was produced at `path`.
    Data { path: Path, value: Value },

    /// Resolution at `path` failed. Nothing else is produced below `path`.
    Error { path: Path, errors: Vec<Error> },

    /// Everything at or under `path` has been emitted.
    Complete { path: Path },
}

impl ExecutionResult {
    pub fn path(&self) -> &Path {
        match self {
            ExecutionResult::Init { path }
            | ExecutionResult::Data { path, .. }
            | ExecutionResult::Error { path, .. }
            | ExecutionResult::Complete { path } => path,
        }
    }

    pub fn is_init(&self) -> bool {
        matches!(self, ExecutionResult::Init { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ExecutionResult::Complete { .. })
    }
}

/// The events of one execution.
pub type ExecutionResultStream = Pin<Box<dyn Stream<Item = ExecutionResult> + Send>>;
