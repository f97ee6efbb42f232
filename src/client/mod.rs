//! Debugger server access
//!
//! The [`DebuggerServer`] trait is the boundary to the process that recorded
//! the job's traces. [`HttpDebuggerServer`] talks to it over HTTP, and
//! [`fetch_with_retry`] wraps any call with the retry policy used for
//! scenario fetches.

pub mod error;
pub mod http;
pub mod mock;
pub mod retry;
pub mod server;

pub use error::ClientError;
pub use http::HttpDebuggerServer;
pub use retry::{fetch_with_retry, RetryExhausted, RetryNotice, RetryPolicy};
pub use server::DebuggerServer;
