//! In-memory adapters for tests and dry runs.

mod processed;
mod tracker;

pub use processed::InMemoryProcessedLog;
pub use tracker::InMemoryTracker;
