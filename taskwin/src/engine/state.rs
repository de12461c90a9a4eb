//! Client-visible state published by the sync engine.

use taskwin_proto::Task;

/// Raw text of the creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Title input, untrimmed.
    pub title: String,
    /// Description input, untrimmed.
    pub description: String,
}

impl FormState {
    /// Reset both inputs to empty strings.
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

/// Coarse view of the engine for presentation.
///
/// `Error` is an annotation over `Idle`: the engine accepts new operations in
/// either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight, no error to show.
    Idle,
    /// An exchange with the service is in flight.
    Loading,
    /// Nothing in flight; the last operation failed.
    Error,
}

/// Snapshot of everything the presentation layer may render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Window of incomplete tasks from the last successful list, in service order.
    pub tasks: Vec<Task>,
    /// `true` while an operation (including its follow-up refresh) is in flight.
    pub pending_operation: bool,
    /// User-facing message from the most recent failure.
    pub last_error: Option<String>,
    /// Creation form inputs.
    pub form: FormState,
}

impl ClientState {
    /// Derive the display phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.pending_operation {
            Phase::Loading
        } else if self.last_error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }
}
