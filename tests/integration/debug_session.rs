//! Integration tests for whole debug sessions
//!
//! Drives the controller through start -> step -> exit sequences against
//! the scripted mock server and checks cache contents, editor updates and
//! request counts together.

use std::time::Duration;

use graft::client::mock::{MockDebuggerServer, MockFailure};
use graft::controller::{ControllerError, StepOutcome};
use graft::editor::{EditorEvent, NoticeLevel};
use graft::scenario::Scenario;
use graft::session::{Mode, NO_SESSION_SUPERSTEP};
use serde_json::json;

use super::common::fixtures::{
    controller, controller_with, settings, settle, three_step_job, vertex, JOB_ID,
};

/// Walking forward through a job rebuilds full scenarios from deltas
#[tokio::test]
async fn test_forward_walk_accumulates_scenarios() {
    let (controller, server, editor) = controller(three_step_job());

    assert_eq!(
        controller.start_debug_session(JOB_ID).await.unwrap(),
        StepOutcome::Fetched { bootstrap: true }
    );
    assert_eq!(
        controller.step_forward().await.unwrap(),
        StepOutcome::Fetched { bootstrap: false }
    );
    assert_eq!(
        controller.step_forward().await.unwrap(),
        StepOutcome::Fetched { bootstrap: false }
    );

    assert_eq!(controller.cached_steps(), vec![-1, 0, 1, 2]);
    assert_eq!(
        serde_json::to_value(controller.scenario_at(2)).unwrap(),
        json!({
            "1": {"vertexValue": 0, "messagesSent": {"2": 1.0}, "debugged": false},
            "2": {"vertexValue": 1, "messagesSent": {"3": 2.0}, "debugged": false},
            "3": {"vertexValue": 3, "debugged": true}
        })
    );

    // One full build, then incremental updates
    let events = editor.events();
    let builds = events
        .iter()
        .filter(|event| matches!(event, EditorEvent::BuildGraph(_)))
        .count();
    let applies = events
        .iter()
        .filter(|event| matches!(event, EditorEvent::ApplyScenario(_)))
        .count();
    assert_eq!(builds, 1);
    assert_eq!(applies, 2);

    let shown = editor.last_scenario().unwrap();
    let traced: Vec<&str> = shown
        .vertices
        .iter()
        .filter(|vertex| vertex.enabled)
        .map(|vertex| vertex.id.as_str())
        .collect();
    assert_eq!(traced, vec!["3"]);

    for step in 0..=2 {
        assert_eq!(server.scenario_requests(JOB_ID, step), 1);
    }
    settle().await;
    assert_eq!(controller.session().max_superstep, 2);
}

/// Going back and forth again never refetches
#[tokio::test]
async fn test_revisits_are_served_from_cache() {
    let (controller, server, editor) = controller(three_step_job());
    controller.start_debug_session(JOB_ID).await.unwrap();
    controller.step_forward().await.unwrap();
    controller.step_forward().await.unwrap();
    let before = controller.scenario_at(1);

    for _ in 0..3 {
        assert_eq!(controller.step_backward().await.unwrap(), StepOutcome::Cached);
    }
    assert_eq!(controller.current_superstep(), -1);
    assert_eq!(controller.current_scenario(), Some(Scenario::new()));

    for _ in 0..3 {
        assert_eq!(controller.step_forward().await.unwrap(), StepOutcome::Cached);
    }

    assert_eq!(controller.scenario_at(1), before);
    for step in 0..=2 {
        assert_eq!(server.scenario_requests(JOB_ID, step), 1);
    }
    assert!(!editor.preloader_visible());
}

/// Leaving debug mode drops everything, and a new job starts from scratch
#[tokio::test]
async fn test_exit_and_switch_job() {
    let server = three_step_job()
        .with_scenario("job_2", 0, Scenario::new().with_vertex("9", vertex(9)))
        .with_supersteps("job_2", vec![0, 1, 2, 3, 4]);
    let (controller, _server, editor) = controller(server);

    controller.start_debug_session(JOB_ID).await.unwrap();
    controller.step_forward().await.unwrap();

    let err = controller.start_debug_session("job_2").await.unwrap_err();
    assert!(matches!(err, ControllerError::AlreadyDebugging(_)));

    controller.exit_debug_session();
    let session = controller.session();
    assert_eq!(session.mode, Mode::Edit);
    assert_eq!(session.current_superstep, NO_SESSION_SUPERSTEP);
    assert_eq!(session.max_superstep, 15);
    assert_eq!(controller.cached_steps(), vec![-1]);
    assert!(!editor.is_readonly());

    assert_eq!(
        controller.start_debug_session("job_2").await.unwrap(),
        StepOutcome::Fetched { bootstrap: true }
    );
    assert_eq!(
        controller.current_scenario(),
        Some(Scenario::new().with_vertex("9", vertex(9)))
    );
    settle().await;
    assert_eq!(controller.session().max_superstep, 4);
}

/// A failed superstep can be requested again
#[tokio::test(start_paused = true)]
async fn test_failed_superstep_can_be_retried() {
    let server = three_step_job().with_flaky_scenario(
        JOB_ID,
        1,
        5,
        Scenario::new().with_vertex("2", vertex(1)),
    );
    let (controller, server, editor) = controller(server);
    controller.start_debug_session(JOB_ID).await.unwrap();

    let started = tokio::time::Instant::now();
    let err = controller.step_forward().await.unwrap_err();
    assert!(matches!(err, ControllerError::FetchFailed { superstep: 1, .. }));
    assert_eq!(started.elapsed(), Duration::from_millis(8000));
    assert_eq!(controller.cached_steps(), vec![-1, 0]);
    assert_eq!(controller.current_superstep(), 1);
    assert_eq!(
        editor.notices(NoticeLevel::Error),
        vec!["Failed to fetch job. Please check your network and debugger server."]
    );

    let outcome = controller.retry_current_superstep().await.unwrap();

    assert_eq!(outcome, StepOutcome::Fetched { bootstrap: false });
    assert_eq!(server.scenario_requests(JOB_ID, 1), 6);
    assert_eq!(controller.cached_steps(), vec![-1, 0, 1]);
}

/// A malformed payload counts as a failed attempt
#[tokio::test(start_paused = true)]
async fn test_malformed_payload_is_retried() {
    let server = MockDebuggerServer::new()
        .with_failing_scenario("job", 0, MockFailure::Malformed)
        .with_supersteps("job", vec![0]);
    let (controller, server, editor) = controller(server);

    let err = controller.start_debug_session("job").await.unwrap_err();

    assert!(matches!(err, ControllerError::FetchFailed { .. }));
    assert_eq!(server.scenario_requests("job", 0), 5);
    assert_eq!(editor.notices(NoticeLevel::Warning).len(), 4);
    // Still in debug mode on the requested superstep
    assert_eq!(controller.mode(), Mode::Debug);
    assert_eq!(controller.current_superstep(), 0);
}

/// A response that arrives after the user switched jobs is dropped
#[tokio::test(start_paused = true)]
async fn test_late_response_from_previous_job_is_dropped() {
    let server = three_step_job()
        .with_scenario_delay(JOB_ID, 1, Duration::from_secs(3))
        .with_scenario("job_2", 0, Scenario::new().with_vertex("9", vertex(9)));
    let (controller, _server, _editor) = controller(server);
    controller.start_debug_session(JOB_ID).await.unwrap();

    let background = controller.clone();
    let pending = tokio::spawn(async move { background.step_forward().await });

    tokio::time::sleep(Duration::from_secs(1)).await;
    controller.exit_debug_session();
    controller.start_debug_session("job_2").await.unwrap();

    assert_eq!(pending.await.unwrap().unwrap(), StepOutcome::Discarded);
    assert_eq!(controller.session().job_id.as_deref(), Some("job_2"));
    assert_eq!(controller.current_superstep(), 0);
    assert_eq!(controller.cached_steps(), vec![-1, 0]);
    assert_eq!(
        controller.current_scenario(),
        Some(Scenario::new().with_vertex("9", vertex(9)))
    );
}

/// Bounds checks can be turned off to allow stepping past the known range
#[tokio::test]
async fn test_unbounded_stepping() {
    let mut unbounded = settings(Duration::from_millis(10));
    unbounded.enforce_bounds = false;
    let server = three_step_job().with_scenario(JOB_ID, 3, Scenario::new());
    let (controller, _server, _editor) = controller_with(server, unbounded);
    controller.start_debug_session(JOB_ID).await.unwrap();

    for _ in 0..3 {
        controller.step_forward().await.unwrap();
    }

    settle().await;
    assert_eq!(controller.current_superstep(), 3);
    assert_eq!(controller.session().max_superstep, 2);
    assert_eq!(controller.cached_steps(), vec![-1, 0, 1, 2, 3]);
}
