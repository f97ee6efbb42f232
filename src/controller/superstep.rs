//! Superstep navigation: cache lookup, fetch with retry, merge and commit

use super::{ControllerError, DebugController, StepOutcome};
use crate::client::fetch_with_retry;
use crate::editor::{marshal_scenario, Notice};
use crate::scenario::{merge, Scenario};
use crate::session::RequestTicket;

/// Keeps the editor preloader up while at least one scenario fetch is in
/// flight
///
/// Overlapping fetches share one preloader: only the first shows it and
/// only the last one to finish hides it, on every exit path.
struct PreloaderGuard<'a> {
    controller: &'a DebugController,
}

impl<'a> PreloaderGuard<'a> {
    fn show(controller: &'a DebugController) -> Self {
        // Editor calls stay under the lock so show and hide cannot reorder
        let mut state = controller.state.lock();
        state.loading += 1;
        if state.loading == 1 {
            controller.editor.show_preloader();
        }
        drop(state);
        Self { controller }
    }
}

impl Drop for PreloaderGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.state.lock();
        state.loading = state.loading.saturating_sub(1);
        if state.loading == 0 {
            self.controller.editor.hide_preloader();
        }
    }
}

/// Result of writing a fetched scenario into the cache
enum Commit {
    /// Stored under the requested superstep
    Stored { scenario: Scenario, bootstrap: bool },
    /// An overlapping request for the same superstep got there first
    AlreadyCached(Scenario),
}

impl DebugController {
    /// Move to the next superstep
    pub async fn step_forward(&self) -> Result<StepOutcome, ControllerError> {
        self.step_by(1).await
    }

    /// Move to the previous superstep
    pub async fn step_backward(&self) -> Result<StepOutcome, ControllerError> {
        self.step_by(-1).await
    }

    /// Request the current superstep again, typically after a failed fetch.
    ///
    /// A superstep that is already cached is simply shown again.
    pub async fn retry_current_superstep(&self) -> Result<StepOutcome, ControllerError> {
        self.step_by(0).await
    }

    async fn step_by(&self, offset: i64) -> Result<StepOutcome, ControllerError> {
        let (job_id, current) = self.debug_position()?;
        self.change_superstep(&job_id, current + offset).await
    }

    /// Show `superstep` of `job_id`, fetching and merging it if not cached.
    ///
    /// The session moves to `superstep` before any I/O. A fetched result is
    /// only committed if the session is still on the same job, superstep and
    /// epoch when it arrives; otherwise it is dropped and
    /// [`StepOutcome::Discarded`] is returned. When every attempt fails the
    /// cache is left untouched and the session stays on `superstep`.
    ///
    /// The superstep range is refreshed by a detached task, so this never
    /// waits on the supersteps endpoint.
    pub async fn change_superstep(
        &self,
        job_id: &str,
        superstep: i64,
    ) -> Result<StepOutcome, ControllerError> {
        let (ticket, bounds) = {
            let mut state = self.state.lock();
            let session = &mut state.session;
            match session.job_id.as_deref() {
                Some(active) if session.is_debugging() && active != job_id => {
                    return Err(ControllerError::JobMismatch {
                        requested: job_id.to_string(),
                        active: active.to_string(),
                    });
                }
                Some(_) if session.is_debugging() => {}
                _ => return Err(ControllerError::NotDebugging),
            }

            let bounds = session.bounds();
            if self.settings.enforce_bounds && !bounds.contains(superstep) {
                return Err(ControllerError::OutOfRange {
                    superstep,
                    min: bounds.min,
                    max: bounds.max,
                });
            }

            session.current_superstep = superstep;
            (session.ticket(job_id, superstep), session.bounds())
        };

        tracing::info!(job_id, superstep, "Changing superstep");
        self.editor.superstep_changed(bounds);

        let refresher = self.clone();
        let refresh_ticket = ticket.clone();
        tokio::spawn(async move { refresher.refresh_max_superstep(refresh_ticket).await });

        self.load_scenario(&ticket).await
    }

    /// Best-effort update of the superstep range from the server
    async fn refresh_max_superstep(&self, ticket: RequestTicket) {
        let supersteps = match self.server.fetch_supersteps(&ticket.job_id).await {
            Ok(supersteps) => supersteps,
            Err(e) => {
                tracing::debug!(job_id = %ticket.job_id, error = %e, "Failed to refresh supersteps");
                return;
            }
        };
        let Some(max) = supersteps.into_iter().max() else {
            return;
        };

        let bounds = {
            let mut state = self.state.lock();
            let session = &mut state.session;
            let same_job = session.epoch() == ticket.epoch
                && session.job_id.as_deref() == Some(ticket.job_id.as_str());
            if !same_job || session.max_superstep == max {
                return;
            }
            session.max_superstep = max;
            session.bounds()
        };

        tracing::debug!(job_id = %ticket.job_id, max, "Updated max superstep");
        self.editor.superstep_changed(bounds);
    }

    async fn load_scenario(&self, ticket: &RequestTicket) -> Result<StepOutcome, ControllerError> {
        let superstep = ticket.superstep;

        let cached = self.state.lock().cache.get(superstep).cloned();
        if let Some(scenario) = cached {
            tracing::debug!(superstep, "Scenario served from cache");
            self.editor.apply_scenario(&marshal_scenario(&scenario));
            return Ok(StepOutcome::Cached);
        }

        let _preloader = PreloaderGuard::show(self);
        let server = &self.server;
        let job_id = ticket.job_id.as_str();
        let fetched = fetch_with_retry(
            self.settings.retry,
            move || server.fetch_scenario(job_id, superstep),
            |notice| {
                self.editor.notify(Notice::warning(format!(
                    "Failed to fetch job. Retrying {} more times...",
                    notice.remaining
                )))
            },
        )
        .await;

        let delta = match fetched {
            Ok(delta) => delta,
            Err(exhausted) => {
                if !self.state.lock().session.is_current(ticket) {
                    tracing::debug!(superstep, "Dropping failure of abandoned fetch");
                    return Ok(StepOutcome::Discarded);
                }
                self.editor.notify(Notice::error(
                    "Failed to fetch job. Please check your network and debugger server.",
                ));
                return Err(ControllerError::FetchFailed {
                    job_id: ticket.job_id.clone(),
                    superstep,
                    source: exhausted,
                });
            }
        };

        let committed = {
            let mut state = self.state.lock();
            if !state.session.is_current(ticket) {
                tracing::debug!(superstep, "Dropping stale scenario response");
                return Ok(StepOutcome::Discarded);
            }

            if let Some(existing) = state.cache.get(superstep) {
                Commit::AlreadyCached(existing.clone())
            } else if state.cache.is_bootstrap_state() {
                state.cache.put(superstep, delta.clone());
                Commit::Stored {
                    scenario: delta,
                    bootstrap: true,
                }
            } else {
                let base = superstep - 1;
                let Some(previous) = state.cache.get(base) else {
                    drop(state);
                    self.editor.notify(Notice::error(format!(
                        "Superstep {base} is not loaded; step back to load it first."
                    )));
                    return Err(ControllerError::MissingBaseState { superstep, base });
                };
                let scenario = merge(previous, &delta);
                state.cache.put(superstep, scenario.clone());
                Commit::Stored {
                    scenario,
                    bootstrap: false,
                }
            }
        };

        match committed {
            Commit::Stored { scenario, bootstrap } => {
                tracing::debug!(superstep, bootstrap, vertices = scenario.len(), "Cached scenario");
                let marshalled = marshal_scenario(&scenario);
                if bootstrap {
                    self.editor.build_graph(&marshalled);
                } else {
                    self.editor.apply_scenario(&marshalled);
                }
                Ok(StepOutcome::Fetched { bootstrap })
            }
            Commit::AlreadyCached(existing) => {
                self.editor.apply_scenario(&marshal_scenario(&existing));
                Ok(StepOutcome::Cached)
            }
        }
    }
}
