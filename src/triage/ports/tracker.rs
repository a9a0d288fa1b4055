//! Tracking service port: pull requests, work items and updates.

use crate::triage::domain::{
    MonitoredBranch, NewTaskRequest, PullRequest, Relation, UpdateRequest, WorkItem, WorkItemId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracking service operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Access to the work tracking service.
#[async_trait]
pub trait WorkItemTracker: Send + Sync {
    /// Lists completed pull requests targeting `branch`, in the order the
    /// service returns them.
    async fn fetch_pull_requests(&self, branch: &MonitoredBranch)
    -> TrackerResult<Vec<PullRequest>>;

    /// Fetches a work item with its relations.
    ///
    /// Returns `None` when the item does not exist.
    async fn fetch_work_item(&self, id: WorkItemId) -> TrackerResult<Option<WorkItem>>;

    /// Fetches the work item a relation points at.
    ///
    /// Returns `None` when the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidRelationUrl`] when the relation URL
    /// does not end in a work item identifier.
    async fn fetch_related(&self, relation: &Relation) -> TrackerResult<Option<WorkItem>> {
        let id = relation
            .target_id()
            .ok_or_else(|| TrackerError::InvalidRelationUrl(relation.url().to_owned()))?;
        self.fetch_work_item(id).await
    }

    /// Applies an update to a work item.
    async fn apply_update(&self, request: &UpdateRequest) -> TrackerResult<()>;

    /// Lists open backlog items and bugs assigned to `developer` that have
    /// no child tasks yet.
    async fn find_pending_parents(&self, developer: &str) -> TrackerResult<Vec<WorkItemId>>;

    /// Creates a task linked under its parent and returns its identifier.
    async fn create_child_task(&self, request: &NewTaskRequest) -> TrackerResult<WorkItemId>;
}

/// Errors returned by tracking service implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The request could not be sent or the response not read.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The service answered with a non-success status.
    #[error("tracking service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A relation URL carries no work item identifier.
    #[error("cannot parse work item identifier from relation URL '{0}'")]
    InvalidRelationUrl(String),
}

impl TrackerError {
    /// Wraps a transport error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
