//! Task resource types.
//!
//! These are the JSON shapes exchanged with the task service: the [`Task`]
//! returned by list/create/complete, the [`NewTask`] body sent on create, and
//! the [`ErrorDetail`] body carried by failure responses.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of incomplete tasks the service returns from a list request.
pub const WINDOW_SIZE: usize = 5;

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Server-assigned task identifier.
///
/// Opaque to clients: it is only ever echoed back in a complete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A task as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier, immutable once created.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free text; `null` or missing on the wire decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Completion flag. List responses only ever carry `false`.
    #[serde(rename = "is_completed", default)]
    pub completed: bool,
    /// Creation time, used by the service to order the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates an incomplete task with no creation time.
    pub fn new(id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: None,
        }
    }
}

/// Body of a create request: exactly a title and a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Task description; may be empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl NewTask {
    /// Creates a request body from a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Failure body returned by the service: `{"detail": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable reason, when the service supplied one.
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorDetail {
    /// Creates a failure body carrying the given reason.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
