//! Seams between the search core and the data layer.

use std::future::Future;

use crate::location::Location;
use crate::types::LookupError;

/// Resolves a free-text query to matching locations.
///
/// Implementations must tolerate overlapping calls for different queries;
/// the search controller may issue a new lookup before an older one resolves.
pub trait LocationLookup: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Location>, LookupError>> + Send;
}

/// Sink for lookup failures. Must not panic.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &LookupError);
}

/// Reports failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &LookupError) {
        tracing::error!("Error searching locations: {}", error);
    }
}
