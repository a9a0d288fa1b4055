//! Step definitions for ready-for-test scenarios.

mod given;
mod then;
mod when;
pub mod world;
