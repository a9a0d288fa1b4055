//! Monitored repository branches.

use super::TriageDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository branch whose completed pull requests are triaged.
///
/// # Examples
///
///     use qa_triage::triage::domain::MonitoredBranch;
///
///     let branches = MonitoredBranch::parse_entry("Shop[staging, main]").expect("valid");
///     assert_eq!(branches.len(), 2);
///     assert_eq!(branches[1].to_string(), "Shop:main");
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonitoredBranch {
    repository: String,
    branch: String,
}

impl MonitoredBranch {
    /// Creates a monitored branch from its parts.
    #[must_use]
    pub fn new(repository: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
        }
    }

    /// Parses one `Repository[branch1, branch2]` entry into a branch per
    /// listed name.
    ///
    /// # Errors
    ///
    /// Returns [`TriageDomainError::InvalidMonitoredBranch`] when the entry
    /// has no bracketed branch list, an empty repository name, or no
    /// non-empty branch names.
    pub fn parse_entry(entry: &str) -> Result<Vec<Self>, TriageDomainError> {
        let invalid = || TriageDomainError::InvalidMonitoredBranch(entry.to_owned());
        let trimmed = entry.trim();
        let (repository, rest) = trimmed.split_once('[').ok_or_else(invalid)?;
        let branch_list = rest.strip_suffix(']').ok_or_else(invalid)?;
        let repository = repository.trim();
        if repository.is_empty() {
            return Err(invalid());
        }

        let branches: Vec<Self> = branch_list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Self::new(repository, name))
            .collect();
        if branches.is_empty() {
            return Err(invalid());
        }
        Ok(branches)
    }

    /// Returns the repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the branch name without the `refs/heads/` prefix.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the fully qualified ref name of the branch.
    #[must_use]
    pub fn ref_name(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }
}

impl fmt::Display for MonitoredBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.branch)
    }
}
