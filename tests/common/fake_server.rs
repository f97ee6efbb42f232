//! In-process debugger server on an ephemeral port

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::json;

type Params = Query<HashMap<String, String>>;

/// Counts requests and fails the first `scenario_failures` scenario calls
#[derive(Clone, Default)]
pub struct FakeServerState {
    pub scenario_calls: Arc<AtomicUsize>,
    pub scenario_failures: usize,
}

async fn scenario(State(state): State<FakeServerState>, Query(params): Params) -> (StatusCode, String) {
    let call = state.scenario_calls.fetch_add(1, Ordering::SeqCst);
    if call < state.scenario_failures {
        return (StatusCode::SERVICE_UNAVAILABLE, "warming up".to_string());
    }

    let body = match (
        params.get("jobId").map(String::as_str),
        params.get("superstepId").map(String::as_str),
    ) {
        (Some("job_1"), Some("0")) => json!({
            "1": {"vertexValue": 1, "messagesSent": {"2": 0.5}},
            "2": {"vertexValue": 2}
        }),
        (Some("job_1"), Some("1")) => json!({
            "2": {"vertexValue": 20, "messagesReceived": {"1": 0.5}}
        }),
        (Some("broken"), _) => return (StatusCode::OK, "{not json".to_string()),
        _ => return (StatusCode::NOT_FOUND, "No such superstep".to_string()),
    };
    (StatusCode::OK, body.to_string())
}

async fn supersteps(Query(params): Params) -> (StatusCode, String) {
    match params.get("jobId").map(String::as_str) {
        Some("job_1") => (StatusCode::OK, "[0, 1]".to_string()),
        _ => (StatusCode::NOT_FOUND, "Unknown job".to_string()),
    }
}

async fn vertex_test(Query(params): Params) -> (StatusCode, String) {
    if params.get("traceType").map(String::as_str) != Some("reg") {
        return (StatusCode::BAD_REQUEST, "traceType missing".to_string());
    }
    match params.get("vertexId").map(String::as_str) {
        Some("2") => (
            StatusCode::OK,
            format!(
                "// {} superstep {}\nclass Vertex2Test {{}}\n",
                params.get("jobId").cloned().unwrap_or_default(),
                params.get("superstepId").cloned().unwrap_or_default()
            ),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "java.io.FileNotFoundException: trace for vertex not found".to_string(),
        ),
    }
}

async fn master_test(Query(params): Params) -> (StatusCode, String) {
    match params.get("superstepId").map(String::as_str) {
        Some(step) => (StatusCode::OK, format!("class MasterTest{step} {{}}")),
        None => (StatusCode::BAD_REQUEST, "superstepId missing".to_string()),
    }
}

pub fn router(state: FakeServerState) -> Router {
    Router::new()
        .route("/scenario", get(scenario))
        .route("/supersteps", get(supersteps))
        .route("/test/vertex", get(vertex_test))
        .route("/test/master", get(master_test))
        .with_state(state)
}

/// Serve `state` on 127.0.0.1 and return the base URL
pub async fn spawn(state: FakeServerState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}
