//! API gateway abstraction for the task service.
//!
//! Defines the [`TaskGateway`] trait the sync engine talks to.
//! Concrete implementations:
//! - [`http::HttpGateway`]: REST over HTTP via `reqwest`
//! - [`memory::InMemoryGateway`]: in-process service model for tests and offline runs
//!
//! Every call is a single attempt. Retry policy, if any, belongs to the caller.

pub mod http;
pub mod memory;

use taskwin_proto::{NewTask, Task, TaskId};

/// Failures a gateway call can end in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP exchange could not complete (DNS, connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status and no usable reason.
    #[error("server returned status {status}")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// The service refused the request and said why in a `detail` field,
    /// whatever the status.
    #[error("rejected by server: {message}")]
    ValidationRejected {
        /// Reason supplied by the service.
        message: String,
    },

    /// The target task does not exist on the service.
    #[error("task not found")]
    NotFound,

    /// A list response carried a body that is not the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Async gateway to the task resource.
///
/// Implementations perform exactly one exchange per call and translate
/// non-success outcomes into [`GatewayError`].
pub trait TaskGateway: Send + Sync {
    /// Fetch the current window of incomplete tasks, in service order.
    fn list_incomplete(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, GatewayError>> + Send;

    /// Create a task from a validated request body.
    ///
    /// `Ok(None)` means the service accepted the task but its reply did not
    /// carry a readable task.
    fn create(
        &self,
        body: &NewTask,
    ) -> impl std::future::Future<Output = Result<Option<Task>, GatewayError>> + Send;

    /// Mark the task with the given id complete.
    fn complete(
        &self,
        id: TaskId,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;
}
