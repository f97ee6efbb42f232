//! Scenario and controller fixtures

use std::sync::Arc;
use std::time::Duration;

use graft::client::mock::MockDebuggerServer;
use graft::client::RetryPolicy;
use graft::controller::{ControllerSettings, DebugController};
use graft::editor::RecordingEditor;
use graft::scenario::{Scenario, VertexRecord};
use serde_json::json;

pub const JOB_ID: &str = "job_201611180000_0001";

pub fn vertex(value: i64) -> VertexRecord {
    VertexRecord::with_value(value)
}

/// Traced vertex with one outgoing message
pub fn sending_vertex(value: i64, to: &str, message: f64) -> VertexRecord {
    let mut record = vertex(value);
    record.messages_sent.insert(to.to_string(), json!(message));
    record
}

/// Three supersteps of a small shortest-paths style job:
/// superstep 0 touches every vertex, later supersteps only some of them
pub fn three_step_job() -> MockDebuggerServer {
    MockDebuggerServer::new()
        .with_scenario(
            JOB_ID,
            0,
            Scenario::new()
                .with_vertex("1", sending_vertex(0, "2", 1.0))
                .with_vertex("2", vertex(i64::MAX))
                .with_vertex("3", vertex(i64::MAX)),
        )
        .with_scenario(JOB_ID, 1, Scenario::new().with_vertex("2", sending_vertex(1, "3", 2.0)))
        .with_scenario(JOB_ID, 2, Scenario::new().with_vertex("3", vertex(3)))
        .with_supersteps(JOB_ID, vec![0, 1, 2])
}

pub fn settings(delay: Duration) -> ControllerSettings {
    ControllerSettings {
        retry: RetryPolicy::new(5, delay),
        ..ControllerSettings::default()
    }
}

/// Controller over `server` with a recording editor
pub fn controller_with(
    server: MockDebuggerServer,
    settings: ControllerSettings,
) -> (DebugController, Arc<MockDebuggerServer>, RecordingEditor) {
    let server = Arc::new(server);
    let editor = RecordingEditor::new();
    let controller = DebugController::new(server.clone(), Arc::new(editor.clone()), settings);
    (controller, server, editor)
}

pub fn controller(
    server: MockDebuggerServer,
) -> (DebugController, Arc<MockDebuggerServer>, RecordingEditor) {
    controller_with(server, settings(Duration::from_millis(2000)))
}

/// Let detached superstep refreshes against the mock run to completion
pub async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}
