//! REST handlers and server startup.
//!
//! Routes, relative to the configured base path:
//!
//! | Method  | Path              | Success              | Failure                  |
//! |---------|-------------------|----------------------|--------------------------|
//! | `GET`   | `/`               | 200, window of tasks | none                     |
//! | `POST`  | `/`               | 201, created task    | 400 `{"detail": ...}`    |
//! | `PATCH` | `/{id}/complete`  | 200, completed task  | 404 `{"detail": ...}`    |

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use taskwin_proto::{ErrorDetail, MAX_TITLE_LENGTH, NewTask, Task, TaskId};

use crate::store::{StoreError, TaskStore};

/// Default base path the task resource is mounted at.
pub const DEFAULT_BASE_PATH: &str = "/api/tasks";

/// Shared service state.
pub struct ApiState {
    /// Backing task table.
    pub store: TaskStore,
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiState {
    /// Creates state backed by an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: TaskStore::new(),
        }
    }
}

/// A failure response carrying a status and a `detail` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                detail: "Task not found".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorDetail::new(self.detail))).into_response()
    }
}

/// Builds the router with the task resource mounted at `base_path`.
///
/// A trailing slash on `base_path` is ignored; an empty path mounts at `/`.
pub fn router(base_path: &str, state: Arc<ApiState>) -> Router {
    let base = normalize_base_path(base_path);
    let item = if base == "/" {
        "/{id}/complete".to_string()
    } else {
        format!("{base}/{{id}}/complete")
    };
    Router::new()
        .route(&base, get(list_tasks).post(create_task))
        .route(&item, patch(complete_task))
        .with_state(state)
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

async fn list_tasks(State(state): State<Arc<ApiState>>) -> Json<Vec<Task>> {
    let window = state.store.latest_incomplete().await;
    tracing::debug!(count = window.len(), "listing incomplete tasks");
    Json(window)
}

async fn create_task(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    if body.title.trim().is_empty() {
        tracing::info!("rejected task with empty title");
        return Err(ApiError::bad_request("Title cannot be empty."));
    }
    if body.title.chars().count() > MAX_TITLE_LENGTH {
        tracing::info!(len = body.title.chars().count(), "rejected oversized title");
        return Err(ApiError::bad_request(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters."
        )));
    }
    let task = state.store.insert(body).await;
    tracing::info!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn complete_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId::new(id);
    match state.store.complete(id).await {
        Ok(task) => {
            tracing::info!(id = %id, "task completed");
            Ok(Json(task))
        }
        Err(e) => {
            tracing::info!(id = %id, error = %e, "complete rejected");
            Err(e.into())
        }
    }
}

/// Starts the service on the given address with a fresh state, mounted at
/// [`DEFAULT_BASE_PATH`].
///
/// Returns the bound address (useful with port 0) and the serve task handle.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, DEFAULT_BASE_PATH, Arc::new(ApiState::new())).await
}

/// Starts the service with a pre-built [`ApiState`] at `base_path`.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server_with_state(
    addr: &str,
    base_path: &str,
    state: Arc<ApiState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(base_path, state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task service error");
        }
    });

    Ok((bound_addr, handle))
}
