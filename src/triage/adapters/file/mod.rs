//! File-backed adapters.

mod processed;

pub use processed::FileProcessedLog;
