//! Post-merge work-item triage.
//!
//! When a pull request merges into a monitored branch, the work items it
//! links are inspected and either tagged ready for test (with a tester
//! assigned), closed outright when they carry the non-testable tag, or left
//! alone. Open parents assigned to configured developers also receive
//! development and QA sub-tasks. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
