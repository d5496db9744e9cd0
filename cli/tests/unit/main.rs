//! Unit tests for confleet CLI
//!
//! These tests use stubbed ports and run fast without external I/O.

mod mocks;
mod pipeline_scenarios;
