//! Per-pass success and failure counters.

use serde::{Deserialize, Serialize};

/// Counters for one processing pass.
///
/// Created fresh at the start of every pass and threaded by mutable
/// reference through item processing; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTally {
    successes: u32,
    failures: u32,
}

impl CycleTally {
    /// Creates a zeroed tally.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            successes: 0,
            failures: 0,
        }
    }

    /// Counts one applied update.
    pub const fn record_success(&mut self) {
        self.successes = self.successes.saturating_add(1);
    }

    /// Counts one failed item.
    pub const fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    /// Adds another tally's counts into this one.
    pub const fn absorb(&mut self, other: Self) {
        self.successes = self.successes.saturating_add(other.successes);
        self.failures = self.failures.saturating_add(other.failures);
    }

    /// Returns the number of successes.
    #[must_use]
    pub const fn successes(self) -> u32 {
        self.successes
    }

    /// Returns the number of failures.
    #[must_use]
    pub const fn failures(self) -> u32 {
        self.failures
    }
}
