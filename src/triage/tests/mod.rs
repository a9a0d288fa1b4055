//! Unit tests for the triage domain, services and adapters.

mod domain_tests;
mod resolver_tests;
mod support;
mod text_tests;
