//! REST adapter for the work tracking service.

mod client;
mod wire;

pub use client::HttpTracker;
