//! Port contracts for post-merge triage.
//!
//! Ports define infrastructure-agnostic interfaces used by triage services.

pub mod processed;
pub mod tracker;

pub use processed::{ProcessedLog, ProcessedLogError, ProcessedLogResult};
pub use tracker::{TrackerError, TrackerResult, WorkItemTracker};
