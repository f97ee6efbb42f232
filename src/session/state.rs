use serde::{Deserialize, Serialize};

use super::cache::BASELINE_SUPERSTEP;

/// `current_superstep` value while no debug session is active
pub const NO_SESSION_SUPERSTEP: i64 = -2;

/// Lowest superstep a session can step back to (the empty baseline)
pub const MIN_SUPERSTEP: i64 = BASELINE_SUPERSTEP;

/// Controller mode
///
/// Edit mode: the graph editor is writable and no job is attached.
/// Debug mode: the editor is read-only and shows supersteps of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Edit,
    Debug,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Edit => "edit",
            Mode::Debug => "debug",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Edit => "Edit Mode",
            Mode::Debug => "Debug Mode",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Position of the session within its known superstep range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBounds {
    pub current: i64,
    pub min: i64,
    pub max: i64,
}

impl StepBounds {
    pub fn contains(&self, step: i64) -> bool {
        (self.min..=self.max).contains(&step)
    }

    /// Whether "previous" should be offered
    pub fn can_step_backward(&self) -> bool {
        self.current > self.min
    }

    /// Whether "next" should be offered
    pub fn can_step_forward(&self) -> bool {
        self.current < self.max
    }
}

/// Identity of the session state a fetch was issued against.
///
/// A response may only be committed while the session still matches the
/// ticket it was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub epoch: u64,
    pub job_id: String,
    pub superstep: i64,
}

/// Job and superstep position of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub job_id: Option<String>,
    pub current_superstep: i64,
    pub min_superstep: i64,
    /// Highest known superstep; refreshed from the server on every step
    pub max_superstep: i64,
    pub mode: Mode,
    default_max_superstep: i64,
    /// Bumped whenever the session is started or reset
    epoch: u64,
}

impl Session {
    pub fn new(default_max_superstep: i64) -> Self {
        Self {
            job_id: None,
            current_superstep: NO_SESSION_SUPERSTEP,
            min_superstep: MIN_SUPERSTEP,
            max_superstep: default_max_superstep,
            mode: Mode::Edit,
            default_max_superstep,
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_debugging(&self) -> bool {
        self.mode == Mode::Debug
    }

    /// Attach `job_id` and enter debug mode at superstep 0
    pub fn begin(&mut self, job_id: impl Into<String>) {
        self.job_id = Some(job_id.into());
        self.current_superstep = 0;
        self.mode = Mode::Debug;
        self.epoch += 1;
    }

    /// Back to edit mode with no job attached
    pub fn reset(&mut self) {
        self.job_id = None;
        self.current_superstep = NO_SESSION_SUPERSTEP;
        self.max_superstep = self.default_max_superstep;
        self.mode = Mode::Edit;
        self.epoch += 1;
    }

    pub fn bounds(&self) -> StepBounds {
        StepBounds {
            current: self.current_superstep,
            min: self.min_superstep,
            max: self.max_superstep,
        }
    }

    /// Ticket for a request made now for `superstep` of `job_id`
    pub fn ticket(&self, job_id: &str, superstep: i64) -> RequestTicket {
        RequestTicket {
            epoch: self.epoch,
            job_id: job_id.to_string(),
            superstep,
        }
    }

    /// Whether a response issued under `ticket` may still be applied
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.epoch == ticket.epoch
            && self.job_id.as_deref() == Some(ticket.job_id.as_str())
            && self.current_superstep == ticket.superstep
    }
}
