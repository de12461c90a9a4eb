//! Shared wire definitions for the `taskwin` task resource.

pub mod codec;
pub mod task;

pub use task::{ErrorDetail, MAX_TITLE_LENGTH, NewTask, Task, TaskId, WINDOW_SIZE};
