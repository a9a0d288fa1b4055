//! Identifier types for the triage domain.

use super::TriageDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive integer identifier of a work item in the tracking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(u32);

impl WorkItemId {
    /// Creates a validated work item identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TriageDomainError::InvalidWorkItemId`] when the value is
    /// zero.
    pub fn new(value: u32) -> Result<Self, TriageDomainError> {
        if value == 0 {
            return Err(TriageDomainError::InvalidWorkItemId(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses an identifier from a run of decimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`TriageDomainError::InvalidWorkItemId`] when the text is not
    /// a positive integer that fits in 32 bits.
    pub fn parse(value: &str) -> Result<Self, TriageDomainError> {
        let trimmed = value.trim();
        let parsed: u32 = trimmed
            .parse()
            .map_err(|_| TriageDomainError::InvalidWorkItemId(trimmed.to_owned()))?;
        Self::new(parsed)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Externally assigned pull request identifier.
///
/// Kept as text because the processed log stores identifiers line by line
/// and compares them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestId(String);

impl PullRequestId {
    /// Creates a validated pull request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TriageDomainError::EmptyPullRequestId`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TriageDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TriageDomainError::EmptyPullRequestId);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PullRequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
