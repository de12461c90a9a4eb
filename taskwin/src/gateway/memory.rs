//! In-process gateway for tests and offline runs.
//!
//! [`InMemoryGateway`] models the task service without a network: it keeps a
//! task table, answers list requests with the newest [`WINDOW_SIZE`]
//! incomplete tasks, rejects blank titles, and reports unknown ids as not
//! found. Every call is recorded, and a failure or a raw list response can be
//! injected for the next call of each operation.

use std::collections::VecDeque;

use parking_lot::Mutex;
use taskwin_proto::{NewTask, Task, TaskId, WINDOW_SIZE};

use super::{GatewayError, TaskGateway};

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `list_incomplete()`.
    List,
    /// `create(body)`.
    Create(NewTask),
    /// `complete(id)`.
    Complete(TaskId),
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    /// Oldest first; the window is read from the back.
    rows: Vec<Task>,
    calls: Vec<Call>,
    list_failures: VecDeque<GatewayError>,
    create_failures: VecDeque<GatewayError>,
    complete_failures: VecDeque<GatewayError>,
    list_responses: VecDeque<Vec<Task>>,
}

/// Service model behind a [`parking_lot::Mutex`].
pub struct InMemoryGateway {
    inner: Mutex<Inner>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    /// Create an empty gateway; the first created task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Create a gateway pre-populated with incomplete tasks, oldest first.
    #[must_use]
    pub fn with_tasks<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let gateway = Self::new();
        {
            let mut inner = gateway.inner.lock();
            for (title, description) in titles {
                inner.insert(NewTask::new(title, description));
            }
        }
        gateway
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    /// Number of `list_incomplete` calls made so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::List))
            .count()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Make the next `list_incomplete` fail with `err`.
    pub fn fail_next_list(&self, err: GatewayError) {
        self.inner.lock().list_failures.push_back(err);
    }

    /// Make the next `create` fail with `err` without touching the table.
    pub fn fail_next_create(&self, err: GatewayError) {
        self.inner.lock().create_failures.push_back(err);
    }

    /// Make the next `complete` fail with `err` without touching the table.
    pub fn fail_next_complete(&self, err: GatewayError) {
        self.inner.lock().complete_failures.push_back(err);
    }

    /// Answer the next `list_incomplete` with `tasks` verbatim, bypassing the
    /// window query.
    pub fn respond_next_list(&self, tasks: Vec<Task>) {
        self.inner.lock().list_responses.push_back(tasks);
    }

    /// Complete a task directly, as another client would.
    pub fn complete_externally(&self, id: TaskId) -> bool {
        let mut inner = self.inner.lock();
        let Some(task) = inner.rows.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = true;
        true
    }
}

impl Inner {
    fn insert(&mut self, body: NewTask) -> Task {
        let task = Task::new(TaskId::new(self.next_id), body.title, body.description);
        self.next_id += 1;
        self.rows.push(task.clone());
        task
    }

    fn window(&self) -> Vec<Task> {
        self.rows
            .iter()
            .rev()
            .filter(|t| !t.completed)
            .take(WINDOW_SIZE)
            .cloned()
            .collect()
    }
}

impl TaskGateway for InMemoryGateway {
    async fn list_incomplete(&self) -> Result<Vec<Task>, GatewayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::List);
        if let Some(err) = inner.list_failures.pop_front() {
            return Err(err);
        }
        if let Some(tasks) = inner.list_responses.pop_front() {
            return Ok(tasks);
        }
        Ok(inner.window())
    }

    async fn create(&self, body: &NewTask) -> Result<Option<Task>, GatewayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Create(body.clone()));
        if let Some(err) = inner.create_failures.pop_front() {
            return Err(err);
        }
        if body.title.trim().is_empty() {
            return Err(GatewayError::ValidationRejected {
                message: "Title cannot be empty.".to_string(),
            });
        }
        Ok(Some(inner.insert(body.clone())))
    }

    async fn complete(&self, id: TaskId) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Complete(id));
        if let Some(err) = inner.complete_failures.pop_front() {
            return Err(err);
        }
        let task = inner
            .rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(GatewayError::NotFound)?;
        task.completed = true;
        Ok(())
    }
}
