//! Integration tests for the HTTP debugger client
//!
//! Runs [`HttpDebuggerServer`] against an axum server bound to an
//! ephemeral local port.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use graft::client::{ClientError, DebuggerServer, HttpDebuggerServer};
use graft::controller::{ControllerError, DebugController, StepOutcome};
use graft::editor::{NoticeLevel, RecordingEditor};
use serde_json::json;

use super::common::fake_server::{self, FakeServerState};
use super::common::fixtures::settings;

async fn client(state: FakeServerState) -> HttpDebuggerServer {
    let base_url = fake_server::spawn(state).await;
    HttpDebuggerServer::new(format!("{base_url}/"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_scenario_decodes_delta() {
    let server = client(FakeServerState::default()).await;

    let delta = server.fetch_scenario("job_1", 0).await.unwrap();

    assert_eq!(delta.len(), 2);
    assert_eq!(
        serde_json::to_value(&delta).unwrap(),
        json!({
            "1": {"vertexValue": 1, "messagesSent": {"2": 0.5}},
            "2": {"vertexValue": 2}
        })
    );
}

#[tokio::test]
async fn test_fetch_supersteps() {
    let server = client(FakeServerState::default()).await;

    assert_eq!(server.fetch_supersteps("job_1").await.unwrap(), vec![0, 1]);
    let err = server.fetch_supersteps("job_9").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_scenario_is_decode_error() {
    let server = client(FakeServerState::default()).await;

    let err = server.fetch_scenario("broken", 0).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_capture_requests() {
    let server = client(FakeServerState::default()).await;

    let code = server.capture_vertex_test("job_1", 1, "2").await.unwrap();
    assert_eq!(code, "// job_1 superstep 1\nclass Vertex2Test {}\n");

    let code = server.capture_master_test("job_1", 4).await.unwrap();
    assert_eq!(code, "class MasterTest4 {}");
}

#[tokio::test]
async fn test_capture_failure_keeps_body_verbatim() {
    let server = client(FakeServerState::default()).await;

    let err = server.capture_vertex_test("job_1", 1, "7").await.unwrap_err();

    match &err {
        ClientError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "java.io.FileNotFoundException: trace for vertex not found");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // Bind and drop a listener to get a port nobody is serving
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let server = HttpDebuggerServer::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();

    let err = server.fetch_supersteps("job_1").await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
}

/// Full session over HTTP: a warming-up server, merge, capture
#[tokio::test]
async fn test_controller_over_http() {
    let state = FakeServerState {
        scenario_failures: 2,
        ..FakeServerState::default()
    };
    let calls = state.scenario_calls.clone();
    let server = client(state).await;
    let editor = RecordingEditor::new();
    let controller = DebugController::new(
        Arc::new(server),
        Arc::new(editor.clone()),
        settings(Duration::from_millis(10)),
    );

    let outcome = controller.start_debug_session("job_1").await.unwrap();
    assert_eq!(outcome, StepOutcome::Fetched { bootstrap: true });
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        editor.notices(NoticeLevel::Warning),
        vec![
            "Failed to fetch job. Retrying 4 more times...",
            "Failed to fetch job. Retrying 3 more times...",
        ]
    );

    controller.step_forward().await.unwrap();
    assert_eq!(
        serde_json::to_value(controller.current_scenario()).unwrap(),
        json!({
            "1": {"vertexValue": 1, "messagesSent": {"2": 0.5}, "debugged": false},
            "2": {"vertexValue": 20, "messagesReceived": {"1": 0.5}, "debugged": true}
        })
    );

    let captured = controller.capture_vertex_scenario("2").await.unwrap();
    assert_eq!(captured.filename, "job_1_1_2.java");

    let err = controller.capture_vertex_scenario("7").await.unwrap_err();
    assert!(matches!(err, ControllerError::Capture(_)));
    assert_eq!(
        err.user_message(),
        "java.io.FileNotFoundException: trace for vertex not found"
    );
}
