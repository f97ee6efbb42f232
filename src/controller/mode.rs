//! Edit ⇄ Debug transitions

use super::{ControllerError, DebugController, StepOutcome};
use crate::session::Mode;

impl DebugController {
    /// Enter debug mode for `job_id` and show its superstep 0.
    ///
    /// The editor becomes read-only before anything is fetched. Starting a
    /// second session without leaving the first is rejected.
    pub async fn start_debug_session(&self, job_id: &str) -> Result<StepOutcome, ControllerError> {
        {
            let mut state = self.state.lock();
            if state.session.mode == Mode::Debug {
                let active = state.session.job_id.clone().unwrap_or_default();
                return Err(ControllerError::AlreadyDebugging(active));
            }
            state.session.begin(job_id);
        }

        tracing::info!(job_id, "Entering debug mode");
        self.editor.set_readonly(true);
        self.change_superstep(job_id, 0).await
    }

    /// Leave debug mode and discard everything the session built.
    ///
    /// Always ends with an empty baseline cache and no job attached, even
    /// when called in edit mode.
    pub fn exit_debug_session(&self) {
        self.editor.set_readonly(false);
        {
            let mut state = self.state.lock();
            if let Some(job_id) = &state.session.job_id {
                tracing::info!(job_id = %job_id, cached = state.cache.len(), "Leaving debug mode");
            }
            state.session.reset();
            state.cache.reset();
        }
        self.editor.enter_edit_mode();
    }
}
