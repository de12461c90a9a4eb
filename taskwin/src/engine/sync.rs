//! The [`SyncEngine`] state machine.

use taskwin_proto::{MAX_TITLE_LENGTH, Task, TaskId, WINDOW_SIZE};
use tokio::sync::watch;

use super::state::ClientState;
use crate::gateway::{GatewayError, TaskGateway};
use crate::validate::{FormRejection, validate_form};

const REFRESH_FAILED: &str = "Could not load tasks. Please check the API connection.";
const TITLE_REQUIRED: &str = "Task title is required.";
const CREATE_FAILED_GENERIC: &str = "Failed to create task.";
const COMPLETE_FAILED: &str = "Failed to mark task as done.";
const COMPLETE_NOT_FOUND: &str = "Failed to mark task as done: task not found.";

/// A user intent forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the title input.
    EditTitle(String),
    /// Replace the description input.
    EditDescription(String),
    /// Re-list the window.
    Refresh,
    /// Submit the creation form.
    Create,
    /// Fill both form inputs and submit them as one step.
    CreateFrom {
        /// Title input.
        title: String,
        /// Description input.
        description: String,
    },
    /// Mark a task complete.
    Complete(TaskId),
}

/// Owns [`ClientState`] and sequences operations against a [`TaskGateway`].
///
/// Each operation runs to completion as one suspending call chain. The
/// `pending_operation` flag is advisory: the engine neither locks nor queues,
/// it only reports. Callers that want to avoid overlapping operations must
/// consult the flag themselves.
pub struct SyncEngine<G: TaskGateway> {
    gateway: G,
    state: ClientState,
    notifier: watch::Sender<ClientState>,
    max_title_len: usize,
}

impl<G: TaskGateway> SyncEngine<G> {
    /// Create an engine with an empty window and an empty form.
    pub fn new(gateway: G) -> Self {
        let (notifier, _) = watch::channel(ClientState::default());
        Self {
            gateway,
            state: ClientState::default(),
            notifier,
            max_title_len: MAX_TITLE_LENGTH,
        }
    }

    /// Set the maximum accepted title length in characters.
    #[must_use]
    pub const fn with_max_title_len(mut self, max: usize) -> Self {
        self.max_title_len = max;
        self
    }

    /// Subscribe to state changes. The receiver always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.notifier.subscribe()
    }

    /// Current state by reference.
    #[must_use]
    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    /// Current state as an owned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ClientState {
        self.state.clone()
    }

    /// The gateway this engine talks to.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replace the title input.
    pub fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.state.form.title);
        self.publish();
    }

    /// Replace the description input.
    pub fn set_description(&mut self, description: &str) {
        description.clone_into(&mut self.state.form.description);
        self.publish();
    }

    /// Apply one presentation-layer intent.
    pub async fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::EditTitle(title) => self.set_title(&title),
            Intent::EditDescription(description) => self.set_description(&description),
            Intent::Refresh => self.refresh().await,
            Intent::Create => self.submit_create().await,
            Intent::CreateFrom { title, description } => {
                // No snapshot for the fill itself; submit publishes the outcome.
                self.state.form.title = title;
                self.state.form.description = description;
                self.submit_create().await;
            }
            Intent::Complete(id) => self.submit_complete(id).await,
        }
    }

    /// Replace the window with a fresh list from the service.
    ///
    /// On failure the previous window stays visible and `last_error` is set.
    pub async fn refresh(&mut self) {
        self.begin("refresh");
        self.reload().await;
        self.finish();
    }

    /// Validate the form and, if accepted, create the task and re-list.
    ///
    /// A locally rejected form sets `last_error` without any network call.
    /// The form is cleared only when the service accepts the task.
    pub async fn submit_create(&mut self) {
        let body = match validate_form(
            &self.state.form.title,
            &self.state.form.description,
            self.max_title_len,
        ) {
            Ok(body) => body,
            Err(rejection) => {
                tracing::debug!(%rejection, "create refused locally");
                self.state.last_error = Some(rejection_message(&rejection));
                self.publish();
                return;
            }
        };

        self.begin("create");
        match self.gateway.create(&body).await {
            Ok(task) => {
                match task {
                    Some(task) => tracing::info!(id = %task.id, "task created"),
                    None => tracing::info!("task created"),
                }
                self.state.form.clear();
                self.publish();
                self.reload().await;
            }
            Err(e) => {
                tracing::warn!(op = "create", error = %e, "operation failed");
                self.state.last_error = Some(create_failure_message(&e));
            }
        }
        self.finish();
    }

    /// Mark a task complete and, on success, re-list.
    ///
    /// On failure the window is left untouched and no re-list happens.
    pub async fn submit_complete(&mut self, id: TaskId) {
        self.begin("complete");
        match self.gateway.complete(id).await {
            Ok(()) => {
                tracing::info!(id = %id, "task completed");
                self.reload().await;
            }
            Err(e) => {
                tracing::warn!(op = "complete", id = %id, error = %e, "operation failed");
                self.state.last_error = Some(complete_failure_message(&e));
            }
        }
        self.finish();
    }

    /// Fetch the window and fold the outcome into state. Leaves the pending
    /// flag to the caller so a mutation and its re-list share one span.
    async fn reload(&mut self) {
        match self.gateway.list_incomplete().await {
            Ok(tasks) => {
                self.state.tasks = enforce_window(tasks);
                self.state.last_error = None;
                tracing::debug!(count = self.state.tasks.len(), "window refreshed");
            }
            Err(e) => {
                tracing::warn!(op = "refresh", error = %e, "operation failed");
                self.state.last_error = Some(REFRESH_FAILED.to_string());
            }
        }
    }

    fn begin(&mut self, op: &'static str) {
        tracing::debug!(op, "operation started");
        self.state.pending_operation = true;
        self.state.last_error = None;
        self.publish();
    }

    fn finish(&mut self) {
        self.state.pending_operation = false;
        self.publish();
    }

    fn publish(&self) {
        self.notifier.send_replace(self.state.clone());
    }
}

/// Drop completed tasks and cap the list at [`WINDOW_SIZE`].
///
/// A conforming service never needs either correction.
fn enforce_window(mut tasks: Vec<Task>) -> Vec<Task> {
    let received = tasks.len();
    tasks.retain(|t| !t.completed);
    if tasks.len() != received {
        tracing::warn!(
            dropped = received - tasks.len(),
            "list response contained completed tasks"
        );
    }
    if tasks.len() > WINDOW_SIZE {
        tracing::warn!(
            received = tasks.len(),
            window = WINDOW_SIZE,
            "list response exceeded the window, truncating"
        );
        tasks.truncate(WINDOW_SIZE);
    }
    tasks
}

fn rejection_message(rejection: &FormRejection) -> String {
    match rejection {
        FormRejection::TitleRequired => TITLE_REQUIRED.to_string(),
        FormRejection::TitleTooLong { max } => {
            format!("Task title is too long (max {max} characters).")
        }
    }
}

fn create_failure_message(err: &GatewayError) -> String {
    match err {
        GatewayError::ValidationRejected { message } => format!("Creation failed: {message}"),
        _ => format!("Creation failed: {CREATE_FAILED_GENERIC}"),
    }
}

fn complete_failure_message(err: &GatewayError) -> String {
    match err {
        GatewayError::NotFound => COMPLETE_NOT_FOUND.to_string(),
        _ => COMPLETE_FAILED.to_string(),
    }
}
