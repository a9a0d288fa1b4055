//! Adapter implementations for triage ports.

pub mod file;
pub mod http;
pub mod memory;
