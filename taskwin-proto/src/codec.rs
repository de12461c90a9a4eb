//! JSON encode/decode for the task resource.
//!
//! Thin wrappers over `serde_json` so that client and service agree on one
//! set of entry points and one error type.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::task::{ErrorDetail, NewTask, Task};

/// Error type for wire encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Serialization failed.
    #[error("encode error: {0}")]
    Encode(String),
    /// The bytes were not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Encodes any wire value as JSON bytes.
///
/// # Errors
///
/// Returns [`WireError::Encode`] if the value cannot be serialized.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(value).map_err(|e| WireError::Encode(e.to_string()))
}

/// Decodes a wire value from JSON bytes.
///
/// # Errors
///
/// Returns [`WireError::Decode`] if the bytes are not valid JSON of type `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    serde_json::from_slice(bytes).map_err(|e| WireError::Decode(e.to_string()))
}

/// Encodes a create request body.
///
/// # Errors
///
/// Returns [`WireError::Encode`] if serialization fails.
pub fn encode_new_task(body: &NewTask) -> Result<Vec<u8>, WireError> {
    encode(body)
}

/// Decodes a list response body.
///
/// # Errors
///
/// Returns [`WireError::Decode`] if the body is not a JSON array of tasks.
pub fn decode_task_list(bytes: &[u8]) -> Result<Vec<Task>, WireError> {
    decode(bytes)
}

/// Decodes a single-task response body.
///
/// # Errors
///
/// Returns [`WireError::Decode`] if the body is not a JSON task object.
pub fn decode_task(bytes: &[u8]) -> Result<Task, WireError> {
    decode(bytes)
}

/// Extracts the `detail` message from a failure body.
///
/// Never fails: an empty, non-JSON, or detail-less body yields `None`, and a
/// blank detail is treated as absent.
#[must_use]
pub fn failure_detail(bytes: &[u8]) -> Option<String> {
    decode::<ErrorDetail>(bytes)
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !detail.trim().is_empty())
}
