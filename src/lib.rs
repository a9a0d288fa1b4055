//! QA triage: moves work items to test once their pull requests merge.
//!
//! Each polling iteration lists the pull requests completed into the
//! monitored branches, resolves the work items they link, and marks each
//! eligible item "ready for test" with a tester assigned. Items flagged as
//! not needing QA are closed once their tasks finish. Optionally, freshly
//! committed backlog items are split into development and QA sub-tasks.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Work items, pull requests, updates and text helpers
//! - **Ports**: Abstract traits for the tracking service and processed log
//! - **Adapters**: REST, file-backed and in-memory implementations
//! - **Services**: Resolution, tester discovery, transitions and passes
//!
//! # Modules
//!
//! - [`config`]: Runtime settings loaded from TOML
//! - [`triage`]: Domain, ports, adapters and services
//! - [`worker`]: The polling loop

pub mod config;
pub mod triage;
pub mod worker;
