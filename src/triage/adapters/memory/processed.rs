//! In-memory processed log.

use crate::triage::{
    domain::PullRequestId,
    ports::{ProcessedLog, ProcessedLogError, ProcessedLogResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe processed log that keeps entries in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProcessedLog {
    entries: Arc<RwLock<Vec<String>>>,
}

impl InMemoryProcessedLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every appended line, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessedLogError::Poisoned`] when the lock is poisoned.
    pub fn entries(&self) -> ProcessedLogResult<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|err| ProcessedLogError::Poisoned(err.to_string()))?;
        Ok(entries.clone())
    }
}

#[async_trait]
impl ProcessedLog for InMemoryProcessedLog {
    async fn is_processed(&self, id: &PullRequestId) -> ProcessedLogResult<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|err| ProcessedLogError::Poisoned(err.to_string()))?;
        Ok(entries.iter().any(|entry| entry == id.as_str()))
    }

    async fn mark_processed(&self, id: &PullRequestId) -> ProcessedLogResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|err| ProcessedLogError::Poisoned(err.to_string()))?;
        entries.push(id.as_str().to_owned());
        Ok(())
    }
}
