use async_trait::async_trait;

use crate::client::error::ClientError;
use crate::scenario::Delta;

/// Remote side of the debugger: traces recorded while the job ran
#[async_trait]
pub trait DebuggerServer: Send + Sync {
    /// Sparse scenario traced during `superstep` of `job_id`
    async fn fetch_scenario(&self, job_id: &str, superstep: i64) -> Result<Delta, ClientError>;

    /// Supersteps for which traces exist
    async fn fetch_supersteps(&self, job_id: &str) -> Result<Vec<i64>, ClientError>;

    /// Generated unit test source reproducing one vertex's superstep
    async fn capture_vertex_test(
        &self,
        job_id: &str,
        superstep: i64,
        vertex_id: &str,
    ) -> Result<String, ClientError>;

    /// Generated unit test source reproducing the master compute of a superstep
    async fn capture_master_test(&self, job_id: &str, superstep: i64)
        -> Result<String, ClientError>;
}
