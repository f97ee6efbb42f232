//! Test-case capture for the current superstep

use super::{ControllerError, DebugController};
use crate::editor::Notice;

/// Generated test source and the file name it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedTest {
    pub code: String,
    pub filename: String,
}

impl DebugController {
    /// Ask the server for a unit test reproducing `vertex_id` at the
    /// current superstep.
    ///
    /// Captures are single requests; a failure is reported with the
    /// server's response body and not retried.
    pub async fn capture_vertex_scenario(&self, vertex_id: &str) -> Result<CapturedTest, ControllerError> {
        let (job_id, superstep) = self.debug_position()?;
        tracing::info!(job_id, superstep, vertex_id, "Capturing vertex test");

        let result = self
            .server
            .capture_vertex_test(&job_id, superstep, vertex_id)
            .await;
        let code = self.capture_result(result)?;
        Ok(self.captured(code, format!("{job_id}_{superstep}_{vertex_id}.java")))
    }

    /// Ask the server for a unit test of the master compute at the current
    /// superstep
    pub async fn capture_master_scenario(&self) -> Result<CapturedTest, ControllerError> {
        let (job_id, superstep) = self.debug_position()?;
        tracing::info!(job_id, superstep, "Capturing master test");

        let result = self.server.capture_master_test(&job_id, superstep).await;
        let code = self.capture_result(result)?;
        Ok(self.captured(code, format!("{job_id}_{superstep}.java")))
    }

    fn captured(&self, code: String, filename: String) -> CapturedTest {
        self.editor.notify(Notice::info(format!("Captured test {filename}")));
        CapturedTest { code, filename }
    }

    fn capture_result(
        &self,
        result: Result<String, crate::client::ClientError>,
    ) -> Result<String, ControllerError> {
        result.map_err(|e| {
            let err = ControllerError::Capture(e);
            tracing::warn!(error = %err, "Capture failed");
            self.editor.notify(Notice::error(err.user_message()));
            err
        })
    }
}
