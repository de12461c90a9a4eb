//! Form intent validation.
//!
//! Checks raw creation-form input before the engine is allowed to spend a
//! network round trip on it.

use taskwin_proto::NewTask;

/// Why a creation form was refused locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormRejection {
    /// The title is empty after trimming.
    #[error("title required")]
    TitleRequired,
    /// The trimmed title is longer than the allowed maximum.
    #[error("title too long (max {max} characters)")]
    TitleTooLong {
        /// Maximum length in characters.
        max: usize,
    },
}

/// Validate raw form fields and produce the request body to send.
///
/// Both fields are trimmed; the description may end up empty.
///
/// # Errors
///
/// Returns [`FormRejection::TitleRequired`] if the trimmed title is empty, or
/// [`FormRejection::TitleTooLong`] if it exceeds `max_title_len` characters.
pub fn validate_form(
    title: &str,
    description: &str,
    max_title_len: usize,
) -> Result<NewTask, FormRejection> {
    let title = title.trim();
    if title.is_empty() {
        return Err(FormRejection::TitleRequired);
    }
    if title.chars().count() > max_title_len {
        return Err(FormRejection::TitleTooLong { max: max_title_len });
    }
    Ok(NewTask::new(title, description.trim()))
}
