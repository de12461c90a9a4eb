//! Task synchronization engine.
//!
//! Keeps the client's view of the task window consistent with the service.
//! Every mutation is followed by a full re-list; the visible window is always
//! replaced wholesale from the service's answer and never patched locally.
//! State changes are published on a [`tokio::sync::watch`] channel so the
//! presentation layer can re-render from a snapshot.

pub mod state;
pub mod sync;

pub use state::{ClientState, FormState, Phase};
pub use sync::{Intent, SyncEngine};
