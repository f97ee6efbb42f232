//! Debug session controller
//!
//! [`DebugController`] owns the [`Session`] and the [`StateCache`] of one
//! debugger instance and turns UI commands (start, next, previous, exit,
//! capture) into cache lookups, server fetches and editor updates.
//!
//! The controller is a cheap-to-clone handle. Commands may overlap (a user
//! stepping faster than the server answers); shared state is only touched
//! under a lock that is never held across an await, and every fetched
//! result is checked against the session before it is committed.

mod capture;
mod error;
mod mode;
mod superstep;

pub use capture::CapturedTest;
pub use error::ControllerError;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::{DebuggerServer, RetryPolicy};
use crate::config::Config;
use crate::editor::EditorAdapter;
use crate::scenario::Scenario;
use crate::session::{Mode, Session, StateCache};

/// Tunables of the controller, usually taken from [`Config`]
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub retry: RetryPolicy,
    /// Upper superstep bound until the server reports the real one
    pub default_max_superstep: i64,
    /// Reject steps outside `[min_superstep, max_superstep]`
    pub enforce_bounds: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            default_max_superstep: 15,
            enforce_bounds: true,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: config.retry_policy(),
            default_max_superstep: config.session.default_max_superstep,
            enforce_bounds: config.session.enforce_bounds,
        }
    }
}

/// How a superstep change was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Served from the state cache without I/O
    Cached,
    /// Fetched from the server and stored.
    ///
    /// `bootstrap` is true when the payload was installed as a full
    /// scenario because nothing but the baseline was cached.
    Fetched { bootstrap: bool },
    /// The session moved on before the response arrived; nothing changed
    Discarded,
}

/// State guarded by the controller lock
#[derive(Debug)]
struct ControllerState {
    session: Session,
    cache: StateCache,
    /// Scenario fetches in flight, across sessions
    loading: usize,
}

/// Handle to one debugger session controller
#[derive(Clone)]
pub struct DebugController {
    state: Arc<Mutex<ControllerState>>,
    server: Arc<dyn DebuggerServer>,
    editor: Arc<dyn EditorAdapter>,
    settings: ControllerSettings,
}

impl DebugController {
    pub fn new(
        server: Arc<dyn DebuggerServer>,
        editor: Arc<dyn EditorAdapter>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                session: Session::new(settings.default_max_superstep),
                cache: StateCache::new(),
                loading: 0,
            })),
            server,
            editor,
            settings,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Copy of the current session state
    pub fn session(&self) -> Session {
        self.state.lock().session.clone()
    }

    pub fn mode(&self) -> Mode {
        self.state.lock().session.mode
    }

    pub fn current_superstep(&self) -> i64 {
        self.state.lock().session.current_superstep
    }

    /// Supersteps with a cached scenario, ascending (always includes -1)
    pub fn cached_steps(&self) -> Vec<i64> {
        self.state.lock().cache.steps()
    }

    pub fn scenario_at(&self, superstep: i64) -> Option<Scenario> {
        self.state.lock().cache.get(superstep).cloned()
    }

    /// Scenario of the current superstep, if it has been loaded
    pub fn current_scenario(&self) -> Option<Scenario> {
        let state = self.state.lock();
        state.cache.get(state.session.current_superstep).cloned()
    }

    /// Job and superstep of the active debug session
    fn debug_position(&self) -> Result<(String, i64), ControllerError> {
        let state = self.state.lock();
        match (&state.session.job_id, state.session.mode) {
            (Some(job_id), Mode::Debug) => Ok((job_id.clone(), state.session.current_superstep)),
            _ => Err(ControllerError::NotDebugging),
        }
    }
}
