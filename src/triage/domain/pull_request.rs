//! Pull request records as fetched from the tracking service.

use super::PullRequestId;
use serde::{Deserialize, Serialize};

/// Merge outcome of a completed pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStatus {
    /// The merge completed.
    Succeeded,
    /// The merge failed, conflicted or was never attempted.
    NotSucceeded,
}

impl MergeStatus {
    /// Maps the tracking service's merge status string.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("succeeded") {
            Self::Succeeded
        } else {
            Self::NotSucceeded
        }
    }
}

/// Identity of the user who created a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    display_name: String,
    unique_name: String,
}

impl UserIdentity {
    /// Creates an identity from its display and domain-qualified names.
    #[must_use]
    pub fn new(display_name: impl Into<String>, unique_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            unique_name: unique_name.into(),
        }
    }

    /// Returns the human readable name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the domain-qualified unique name, e.g. `DOMAIN\alice`.
    #[must_use]
    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }
}

/// Completed pull request targeting a monitored branch.
///
/// Immutable once fetched; deduplicated by [`PullRequest::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    id: PullRequestId,
    creator: UserIdentity,
    merge_status: MergeStatus,
    source_branch: String,
    target_branch: Option<String>,
    merge_commit_message: Option<String>,
}

impl PullRequest {
    /// Creates a pull request record with the required fields.
    #[must_use]
    pub fn new(
        id: PullRequestId,
        creator: UserIdentity,
        merge_status: MergeStatus,
        source_branch: impl Into<String>,
    ) -> Self {
        Self {
            id,
            creator,
            merge_status,
            source_branch: source_branch.into(),
            target_branch: None,
            merge_commit_message: None,
        }
    }

    /// Sets the target ref name.
    #[must_use]
    pub fn with_target_branch(mut self, target_branch: impl Into<String>) -> Self {
        self.target_branch = Some(target_branch.into());
        self
    }

    /// Sets the merge commit message.
    ///
    /// An empty message is still a present message: the resolver only
    /// falls back to the source branch when no message field exists.
    #[must_use]
    pub fn with_merge_commit_message(mut self, message: impl Into<String>) -> Self {
        self.merge_commit_message = Some(message.into());
        self
    }

    /// Returns the pull request identifier.
    #[must_use]
    pub const fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Returns the creator identity.
    #[must_use]
    pub const fn creator(&self) -> &UserIdentity {
        &self.creator
    }

    /// Returns the merge outcome.
    #[must_use]
    pub const fn merge_status(&self) -> MergeStatus {
        self.merge_status
    }

    /// Returns `true` when the merge completed.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.merge_status == MergeStatus::Succeeded
    }

    /// Returns the source ref name.
    #[must_use]
    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    /// Returns the target ref name, if the service reported one.
    #[must_use]
    pub fn target_branch(&self) -> Option<&str> {
        self.target_branch.as_deref()
    }

    /// Returns the merge commit message, if the field was present.
    #[must_use]
    pub fn merge_commit_message(&self) -> Option<&str> {
        self.merge_commit_message.as_deref()
    }
}
