use crate::client::{ClientError, RetryExhausted};

/// Errors returned by [`DebugController`](super::DebugController) commands
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The command needs an active debug session.
    #[error("Not in debug mode")]
    NotDebugging,

    /// A debug session is already running.
    #[error("Already debugging job {0}; return to edit mode first")]
    AlreadyDebugging(String),

    /// The command names a job other than the one being debugged.
    #[error("Job {requested} is not the job being debugged ({active})")]
    JobMismatch { requested: String, active: String },

    /// The requested superstep lies outside the known range.
    #[error("Superstep {superstep} is outside the range {min}..={max}")]
    OutOfRange { superstep: i64, min: i64, max: i64 },

    /// Every attempt to fetch the superstep failed.
    ///
    /// Nothing was written to the cache; the session stays on the
    /// requested superstep so the user can retry.
    #[error("Failed to fetch superstep {superstep} of job {job_id}: {source}")]
    FetchFailed {
        job_id: String,
        superstep: i64,
        #[source]
        source: RetryExhausted<ClientError>,
    },

    /// The previous superstep is not cached, so the delta has nothing to
    /// merge onto (its own fetch was abandoned or failed).
    #[error("Superstep {base} is not loaded; cannot build superstep {superstep}")]
    MissingBaseState { superstep: i64, base: i64 },

    /// Test capture failed; not retried.
    #[error("Capture failed: {0}")]
    Capture(#[source] ClientError),
}

impl ControllerError {
    /// Text to show the user, with server-provided failure bodies verbatim
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::Capture(err) => err
                .body()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
            other => other.to_string(),
        }
    }

    /// Whether the editor was already sent a notice for this error
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            ControllerError::FetchFailed { .. }
                | ControllerError::MissingBaseState { .. }
                | ControllerError::Capture(_)
        )
    }
}
