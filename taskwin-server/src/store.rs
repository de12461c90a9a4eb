//! In-memory task table.
//!
//! The [`TaskStore`] keeps every task ever created, completed or not, and
//! answers the windowed list query: the newest [`WINDOW_SIZE`] incomplete
//! tasks by creation time.

use chrono::Utc;
use taskwin_proto::{NewTask, Task, TaskId, WINDOW_SIZE};
use tokio::sync::RwLock;

/// Errors returned by store mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No task with the given id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

struct Table {
    next_id: u64,
    rows: Vec<Task>,
}

/// Thread-safe in-memory task table with monotonically increasing ids.
pub struct TaskStore {
    table: RwLock<Table>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store; the first task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }

    /// Inserts a new incomplete task stamped with the current time.
    ///
    /// The caller is responsible for validating the title.
    pub async fn insert(&self, new: NewTask) -> Task {
        let mut table = self.table.write().await;
        let id = TaskId::new(table.next_id);
        table.next_id += 1;
        let task = Task {
            id,
            title: new.title,
            description: new.description,
            completed: false,
            created_at: Some(Utc::now()),
        };
        table.rows.push(task.clone());
        drop(table);
        task
    }

    /// Returns the newest incomplete tasks, at most [`WINDOW_SIZE`] of them.
    ///
    /// Ordered by `created_at` descending; equal timestamps fall back to the
    /// higher id first.
    pub async fn latest_incomplete(&self) -> Vec<Task> {
        let table = self.table.read().await;
        let mut open: Vec<Task> = table.rows.iter().filter(|t| !t.completed).cloned().collect();
        drop(table);
        open.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        open.truncate(WINDOW_SIZE);
        open
    }

    /// Marks a task complete and returns it.
    ///
    /// Completing an already-complete task returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has the given id.
    pub async fn complete(&self, id: TaskId) -> Result<Task, StoreError> {
        let mut table = self.table.write().await;
        let task = table
            .rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.completed = true;
        Ok(task.clone())
    }

    /// Returns the total number of stored tasks, completed ones included.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns `true` if no task was ever created.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
