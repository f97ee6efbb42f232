//! Integration tests for graft
//!
//! These tests drive the controller through whole debug sessions, against
//! the mock server and against a real HTTP server.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod debug_session;
pub mod http_client;
