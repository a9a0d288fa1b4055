//! Processed pull request log port.

use crate::triage::domain::PullRequestId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for processed log operations.
pub type ProcessedLogResult<T> = Result<T, ProcessedLogError>;

/// Append-only durable set of handled pull request identifiers.
///
/// Safe under a single writer only: the read-then-append sequence is not
/// atomic per identifier.
#[async_trait]
pub trait ProcessedLog: Send + Sync {
    /// Returns `true` when `id` has been marked at least once. A log that
    /// does not exist yet contains nothing.
    async fn is_processed(&self, id: &PullRequestId) -> ProcessedLogResult<bool>;

    /// Appends `id`. Marking the same identifier twice is allowed.
    async fn mark_processed(&self, id: &PullRequestId) -> ProcessedLogResult<()>;
}

/// Errors returned by processed log implementations.
#[derive(Debug, Clone, Error)]
pub enum ProcessedLogError {
    /// Storage-layer failure.
    #[error("processed log storage error: {0}")]
    Storage(Arc<std::io::Error>),

    /// The in-memory log's lock was poisoned.
    #[error("processed log lock poisoned: {0}")]
    Poisoned(String),
}

impl From<std::io::Error> for ProcessedLogError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(Arc::new(err))
    }
}
