//! Utilities for integration tests.
//!
//! The `test-util` crate provides an in-process fake runtime that speaks the
//! frame protocol, plus small fixtures for sessions and load scripts. It is
//! used by the integration tests in the main crate.

pub mod fixtures;
pub mod protocol;
pub mod runtime;

pub use fixtures::{closed_port, recording_session, test_config, write_script};
pub use runtime::{FakeRuntime, Reply};
