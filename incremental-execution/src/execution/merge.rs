use futures::StreamExt;
use futures::stream;

use crate::result::ExecutionResultStream;

/// Merges independent event streams into one.
///
/// Each source keeps its own order; events of different sources are interleaved as the sources
/// make progress. The merged stream ends once every source has ended, so an empty set of sources
/// yields a stream that ends right away.
pub(super) fn merge<I>(streams: I) -> ExecutionResultStream
where
    I: IntoIterator<Item = ExecutionResultStream>,
{
    stream::select_all(streams).boxed()
}
