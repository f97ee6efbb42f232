//! Mock debugger server for deterministic testing
//!
//! Implements [`DebuggerServer`] from pre-configured traces without any
//! network access. Scenario responses can be made to fail a number of times
//! before succeeding, or to resolve only after a delay, which is how the
//! retry and stale-response paths of the controller are exercised. The
//! supersteps list can be delayed too, to show that navigation never waits
//! on it.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use graft::client::mock::MockDebuggerServer;
//! use graft::scenario::{Scenario, VertexRecord};
//!
//! let server = Arc::new(
//!     MockDebuggerServer::new()
//!         .with_scenario("job_1", 0, Scenario::new().with_vertex("1", VertexRecord::with_value(5)))
//!         .with_flaky_scenario("job_1", 1, 2, Scenario::new())
//!         .with_supersteps("job_1", vec![0, 1]),
//! );
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::error::ClientError;
use crate::client::server::DebuggerServer;
use crate::scenario::Delta;

/// Failure to simulate for a request
#[derive(Clone, Debug)]
pub enum MockFailure {
    /// 503 with a generic body
    Unavailable,
    /// Arbitrary status and body
    Status(u16, String),
    /// Success status with a body that is not valid JSON
    Malformed,
}

impl MockFailure {
    fn into_client_error(self) -> ClientError {
        match self {
            MockFailure::Unavailable => ClientError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            },
            MockFailure::Status(status, body) => ClientError::Status { status, body },
            MockFailure::Malformed => ClientError::Decode(<serde_json::Error as serde::de::Error>::custom(
                "mock response is not valid JSON",
            )),
        }
    }
}

/// Request received by the mock, in arrival order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
    Scenario { job_id: String, superstep: i64 },
    Supersteps { job_id: String },
    VertexTest { job_id: String, superstep: i64, vertex_id: String },
    MasterTest { job_id: String, superstep: i64 },
}

/// Scripted behaviour of one `(job, superstep)` scenario
#[derive(Clone, Debug, Default)]
struct ScenarioScript {
    /// Failures returned by the first calls, in order
    failures: Vec<MockFailure>,
    /// Returned once the failures are used up; `None` fails forever
    delta: Option<Delta>,
    /// Delay before each response
    delay: Duration,
}

type ScenarioKey = (String, i64);

/// Mock [`DebuggerServer`] for tests
#[derive(Default)]
pub struct MockDebuggerServer {
    scenarios: HashMap<ScenarioKey, ScenarioScript>,
    supersteps: HashMap<String, Result<Vec<i64>, MockFailure>>,
    supersteps_delays: HashMap<String, Duration>,
    vertex_tests: HashMap<(String, i64, String), Result<String, MockFailure>>,
    master_tests: HashMap<ScenarioKey, Result<String, MockFailure>>,
    /// Calls made per scenario key, for stepping through failure scripts
    scenario_attempts: Arc<Mutex<HashMap<ScenarioKey, usize>>>,
    /// Every request received
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockDebuggerServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&mut self, job_id: &str, superstep: i64) -> &mut ScenarioScript {
        self.scenarios
            .entry((job_id.to_string(), superstep))
            .or_default()
    }

    /// Serve `delta` for the superstep
    pub fn with_scenario(mut self, job_id: &str, superstep: i64, delta: Delta) -> Self {
        self.script(job_id, superstep).delta = Some(delta);
        self
    }

    /// Fail the first `failures` requests for the superstep, then serve `delta`
    pub fn with_flaky_scenario(
        mut self,
        job_id: &str,
        superstep: i64,
        failures: usize,
        delta: Delta,
    ) -> Self {
        let script = self.script(job_id, superstep);
        script.failures = vec![MockFailure::Unavailable; failures];
        script.delta = Some(delta);
        self
    }

    /// Fail every request for the superstep with `failure`
    pub fn with_failing_scenario(mut self, job_id: &str, superstep: i64, failure: MockFailure) -> Self {
        let script = self.script(job_id, superstep);
        script.failures = vec![failure];
        script.delta = None;
        self
    }

    /// Delay every response for the superstep
    pub fn with_scenario_delay(mut self, job_id: &str, superstep: i64, delay: Duration) -> Self {
        self.script(job_id, superstep).delay = delay;
        self
    }

    pub fn with_supersteps(mut self, job_id: &str, supersteps: Vec<i64>) -> Self {
        self.supersteps.insert(job_id.to_string(), Ok(supersteps));
        self
    }

    /// Delay every supersteps response for the job
    pub fn with_supersteps_delay(mut self, job_id: &str, delay: Duration) -> Self {
        self.supersteps_delays.insert(job_id.to_string(), delay);
        self
    }

    pub fn with_failing_supersteps(mut self, job_id: &str, failure: MockFailure) -> Self {
        self.supersteps.insert(job_id.to_string(), Err(failure));
        self
    }

    pub fn with_vertex_test(
        mut self,
        job_id: &str,
        superstep: i64,
        vertex_id: &str,
        result: Result<String, MockFailure>,
    ) -> Self {
        self.vertex_tests
            .insert((job_id.to_string(), superstep, vertex_id.to_string()), result);
        self
    }

    pub fn with_master_test(
        mut self,
        job_id: &str,
        superstep: i64,
        result: Result<String, MockFailure>,
    ) -> Self {
        self.master_tests
            .insert((job_id.to_string(), superstep), result);
        self
    }

    /// Get every request received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of scenario requests made for the superstep
    pub fn scenario_requests(&self, job_id: &str, superstep: i64) -> usize {
        self.scenario_attempts
            .lock()
            .get(&(job_id.to_string(), superstep))
            .copied()
            .unwrap_or(0)
    }

    /// Number of supersteps requests made for the job
    pub fn superstep_requests(&self, job_id: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MockCall::Supersteps { job_id: id } if id == job_id))
            .count()
    }

    fn not_found(what: &str) -> ClientError {
        ClientError::Status {
            status: 404,
            body: format!("No trace for {what}"),
        }
    }
}

#[async_trait]
impl DebuggerServer for MockDebuggerServer {
    async fn fetch_scenario(&self, job_id: &str, superstep: i64) -> Result<Delta, ClientError> {
        self.calls.lock().push(MockCall::Scenario {
            job_id: job_id.to_string(),
            superstep,
        });

        let key = (job_id.to_string(), superstep);
        let attempt = {
            let mut attempts = self.scenario_attempts.lock();
            let count = attempts.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let Some(script) = self.scenarios.get(&key) else {
            return Err(Self::not_found(&format!("superstep {superstep} of {job_id}")));
        };

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match (script.failures.get(attempt - 1), &script.delta) {
            (Some(failure), _) => Err(failure.clone().into_client_error()),
            (None, Some(delta)) => Ok(delta.clone()),
            // Scripted to fail forever: repeat the last failure
            (None, None) => Err(script
                .failures
                .last()
                .cloned()
                .unwrap_or(MockFailure::Unavailable)
                .into_client_error()),
        }
    }

    async fn fetch_supersteps(&self, job_id: &str) -> Result<Vec<i64>, ClientError> {
        self.calls.lock().push(MockCall::Supersteps {
            job_id: job_id.to_string(),
        });

        if let Some(delay) = self.supersteps_delays.get(job_id) {
            tokio::time::sleep(*delay).await;
        }

        match self.supersteps.get(job_id) {
            Some(Ok(supersteps)) => Ok(supersteps.clone()),
            Some(Err(failure)) => Err(failure.clone().into_client_error()),
            None => Err(Self::not_found(&format!("job {job_id}"))),
        }
    }

    async fn capture_vertex_test(
        &self,
        job_id: &str,
        superstep: i64,
        vertex_id: &str,
    ) -> Result<String, ClientError> {
        self.calls.lock().push(MockCall::VertexTest {
            job_id: job_id.to_string(),
            superstep,
            vertex_id: vertex_id.to_string(),
        });

        let key = (job_id.to_string(), superstep, vertex_id.to_string());
        match self.vertex_tests.get(&key) {
            Some(Ok(code)) => Ok(code.clone()),
            Some(Err(failure)) => Err(failure.clone().into_client_error()),
            None => Err(Self::not_found(&format!("vertex {vertex_id}"))),
        }
    }

    async fn capture_master_test(
        &self,
        job_id: &str,
        superstep: i64,
    ) -> Result<String, ClientError> {
        self.calls.lock().push(MockCall::MasterTest {
            job_id: job_id.to_string(),
            superstep,
        });

        match self.master_tests.get(&(job_id.to_string(), superstep)) {
            Some(Ok(code)) => Ok(code.clone()),
            Some(Err(failure)) => Err(failure.clone().into_client_error()),
            None => Err(Self::not_found(&format!("master of superstep {superstep}"))),
        }
    }
}
