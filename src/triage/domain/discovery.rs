//! Outcome of tester discovery.

/// Result of searching a work item for the person who should test it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TesterDiscovery {
    /// A domain-qualified account was found.
    Found(String),
    /// Nothing usable was found; the caller applies the default tester.
    NotFound,
    /// A development sub-task is still open, so the parent is not ready to
    /// be evaluated at all during this pass.
    Blocked {
        /// Assignee of the open development task.
        developer: String,
    },
}
