//! Debug session state
//!
//! This module holds the two pieces of mutable state owned by the
//! controller: the superstep [`StateCache`] and the [`Session`] position
//! (job, superstep, mode).

pub mod cache;
mod state;

pub use cache::{StateCache, BASELINE_SUPERSTEP};
pub use state::{
    Mode, RequestTicket, Session, StepBounds, MIN_SUPERSTEP, NO_SESSION_SUPERSTEP,
};
