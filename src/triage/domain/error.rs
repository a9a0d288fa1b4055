//! Error types for triage domain validation and parsing.

use super::PullRequestId;
use thiserror::Error;

/// Errors returned while constructing triage domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriageDomainError {
    /// The work item identifier is not a positive integer.
    #[error("invalid work item identifier '{0}', expected a positive integer")]
    InvalidWorkItemId(String),

    /// The pull request identifier is empty after trimming.
    #[error("pull request identifier must not be empty")]
    EmptyPullRequestId,

    /// A monitored repository entry does not follow `Repository[branch, ...]`.
    #[error("invalid repository entry '{0}', expected Repository[branch1, branch2]")]
    InvalidMonitoredBranch(String),

    /// The pull request links no work item in any form the resolver accepts.
    #[error(transparent)]
    Unresolvable(#[from] UnresolvablePullRequest),
}

/// Raised when a pull request has no merge commit message and its source
/// branch carries no work item number either.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no work items found for pull request {pull_request}, tried source branch '{source_branch}'")]
pub struct UnresolvablePullRequest {
    /// Pull request that could not be resolved.
    pub pull_request: PullRequestId,
    /// Source branch that was searched.
    pub source_branch: String,
}
