//! Integration tests for the HTTP gateway against the reference task service
//! and against stub routers that misbehave on purpose.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

use taskwin::engine::SyncEngine;
use taskwin::gateway::http::HttpGateway;
use taskwin::gateway::{GatewayError, TaskGateway};
use taskwin_proto::{NewTask, TaskId};
use taskwin_server::api::start_server;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Starts the reference service on an ephemeral port and returns a gateway
/// pointed at its task resource.
async fn live_gateway() -> HttpGateway {
    let (addr, _handle) = start_server("127.0.0.1:0").await.unwrap();
    HttpGateway::from_url(&format!("http://{addr}/api/tasks"), Duration::from_secs(5)).unwrap()
}

/// Serves `app` on an ephemeral port and returns a gateway for `/api/tasks`.
async fn stub_gateway(app: Router) -> HttpGateway {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpGateway::from_url(&format!("http://{addr}/api/tasks"), Duration::from_secs(5)).unwrap()
}

// ---------------------------------------------------------------------------
// Against the reference service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_service_lists_nothing() {
    let gw = live_gateway().await;
    assert!(gw.list_incomplete().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_then_list_newest_first() {
    let gw = live_gateway().await;

    let first = gw.create(&NewTask::new("Buy milk", "2 litres")).await.unwrap().unwrap();
    let second = gw.create(&NewTask::new("Call mum", "")).await.unwrap().unwrap();
    assert_eq!(first.title, "Buy milk");
    assert_eq!(first.description, "2 litres");
    assert!(!first.completed);
    assert!(first.created_at.is_some());
    assert_ne!(first.id, second.id);

    let listed = gw.list_incomplete().await.unwrap();
    let ids: Vec<TaskId> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn list_is_capped_at_five() {
    let gw = live_gateway().await;
    for n in 1..=7 {
        gw.create(&NewTask::new(format!("T{n}"), "")).await.unwrap();
    }

    let titles: Vec<String> = gw
        .list_incomplete()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["T7", "T6", "T5", "T4", "T3"]);
}

#[tokio::test]
async fn blank_title_is_rejected_with_detail() {
    let gw = live_gateway().await;
    let err = gw.create(&NewTask::new("  ", "x")).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::ValidationRejected {
            message: "Title cannot be empty.".to_string()
        }
    );
}

#[tokio::test]
async fn oversized_title_is_rejected_with_detail() {
    let gw = live_gateway().await;
    let err = gw
        .create(&NewTask::new("x".repeat(300), ""))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::ValidationRejected {
            message: "Title cannot exceed 255 characters.".to_string()
        }
    );
}

#[tokio::test]
async fn complete_removes_from_list_and_is_idempotent() {
    let gw = live_gateway().await;
    let task = gw.create(&NewTask::new("A", "")).await.unwrap().unwrap();

    gw.complete(task.id).await.unwrap();
    assert!(gw.list_incomplete().await.unwrap().is_empty());

    gw.complete(task.id).await.unwrap();
}

#[tokio::test]
async fn complete_unknown_id_is_not_found() {
    let gw = live_gateway().await;
    let err = gw.complete(TaskId::new(404)).await.unwrap_err();
    assert_eq!(err, GatewayError::NotFound);
}

#[tokio::test]
async fn trailing_slash_base_url_reaches_same_resource() {
    let (addr, _handle) = start_server("127.0.0.1:0").await.unwrap();
    let gw =
        HttpGateway::from_url(&format!("http://{addr}/api/tasks/"), Duration::from_secs(5)).unwrap();

    let task = gw.create(&NewTask::new("A", "")).await.unwrap().unwrap();
    gw.complete(task.id).await.unwrap();
    assert!(gw.list_incomplete().await.unwrap().is_empty());
}

#[tokio::test]
async fn engine_end_to_end_over_http() {
    let mut engine = SyncEngine::new(live_gateway().await);

    engine.refresh().await;
    assert!(engine.state().tasks.is_empty());
    assert!(engine.state().last_error.is_none());

    engine.set_title("  Water the plants ");
    engine.set_description(" balcony ");
    engine.submit_create().await;

    let state = engine.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].title, "Water the plants");
    assert_eq!(state.tasks[0].description, "balcony");
    assert!(state.form.title.is_empty());
    assert!(state.last_error.is_none());

    engine.submit_complete(TaskId::new(999)).await;
    assert_eq!(engine.state().tasks.len(), 1);
    assert_eq!(
        engine.state().last_error.as_deref(),
        Some("Failed to mark task as done: task not found.")
    );

    let id = engine.state().tasks[0].id;
    engine.submit_complete(id).await;
    assert!(engine.state().tasks.is_empty());
    assert!(engine.state().last_error.is_none());
    assert!(!engine.state().pending_operation);
}

// ---------------------------------------------------------------------------
// Against stubs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_server_error_reports_status() {
    let app = Router::new().route(
        "/api/tasks",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let gw = stub_gateway(app).await;

    let err = gw.list_incomplete().await.unwrap_err();
    assert_eq!(err, GatewayError::Server { status: 500 });
}

#[tokio::test]
async fn list_malformed_body_is_decode_error() {
    let app = Router::new().route("/api/tasks", get(|| async { "not json" }));
    let gw = stub_gateway(app).await;

    let err = gw.list_incomplete().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn create_failure_without_detail_is_server_error() {
    let app = Router::new().route(
        "/api/tasks",
        get(|| async { "[]" }).post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "nope") }),
    );
    let gw = stub_gateway(app).await;

    let err = gw.create(&NewTask::new("A", "")).await.unwrap_err();
    assert_eq!(err, GatewayError::Server { status: 422 });
}

/// Stub whose POST answers 503 with a `detail` reason.
fn unavailable_with_detail() -> Router {
    Router::new().route(
        "/api/tasks",
        get(|| async { "[]" }).post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "application/json")],
                r#"{"detail":"database is down"}"#,
            )
        }),
    )
}

#[tokio::test]
async fn create_5xx_with_detail_carries_reason() {
    let gw = stub_gateway(unavailable_with_detail()).await;

    let err = gw.create(&NewTask::new("A", "")).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::ValidationRejected {
            message: "database is down".to_string()
        }
    );
}

#[tokio::test]
async fn engine_shows_server_detail_on_5xx_create() {
    let mut engine = SyncEngine::new(stub_gateway(unavailable_with_detail()).await);

    engine.set_title("A");
    engine.submit_create().await;

    let state = engine.snapshot();
    assert_eq!(
        state.last_error.as_deref(),
        Some("Creation failed: database is down")
    );
    assert_eq!(state.form.title, "A");
}

/// Stub whose POST answers a bare 201 and whose GET lists one task.
fn accepts_without_body() -> Router {
    Router::new().route(
        "/api/tasks",
        get(|| async {
            (
                [("content-type", "application/json")],
                r#"[{"id":1,"title":"A","description":"","is_completed":false}]"#,
            )
        })
        .post(|| async { StatusCode::CREATED }),
    )
}

#[tokio::test]
async fn create_2xx_without_task_body_is_accepted() {
    let gw = stub_gateway(accepts_without_body()).await;
    assert_eq!(gw.create(&NewTask::new("A", "")).await, Ok(None));
}

#[tokio::test]
async fn engine_treats_bodiless_201_as_success() {
    let mut engine = SyncEngine::new(stub_gateway(accepts_without_body()).await);

    engine.set_title("A");
    engine.submit_create().await;

    let state = engine.snapshot();
    assert!(state.last_error.is_none(), "{:?}", state.last_error);
    assert!(state.form.title.is_empty());
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].title, "A");
    assert!(!state.pending_operation);
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gw =
        HttpGateway::from_url(&format!("http://{addr}/api/tasks"), Duration::from_secs(2)).unwrap();
    let err = gw.list_incomplete().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)), "{err:?}");

    let mut engine = SyncEngine::new(gw);
    engine.refresh().await;
    assert_eq!(
        engine.state().last_error.as_deref(),
        Some("Could not load tasks. Please check the API connection.")
    );
}
