//! Service-level errors for triage operations.

use crate::triage::{
    domain::TriageDomainError,
    ports::{ProcessedLogError, TrackerError},
};
use thiserror::Error;

/// Service-level errors for triage operations.
#[derive(Debug, Error)]
pub enum TriageServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TriageDomainError),
    /// The tracking service failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    /// The processed log failed.
    #[error(transparent)]
    ProcessedLog(#[from] ProcessedLogError),
    /// The notification comment could not be rendered.
    #[error("failed to render comment for work item {work_item}: {reason}")]
    CommentRender {
        /// Work item the comment was meant for.
        work_item: String,
        /// Renderer message.
        reason: String,
    },
    /// A work item linked by a pull request does not exist.
    #[error("work item {0} not found")]
    WorkItemNotFound(String),
}

/// Result type for triage service operations.
pub type TriageServiceResult<T> = Result<T, TriageServiceError>;
