//! Shared test utilities for graft
//!
//! - Scenario and controller fixtures
//! - An in-process HTTP debugger server

pub mod fake_server;
pub mod fixtures;
