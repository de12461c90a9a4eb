//! Property tests for creation-form validation.
//!
//! 1. Whitespace-only titles are always refused, whatever the description.
//! 2. Accepted bodies carry exactly the trimmed inputs.
//! 3. The length limit counts characters, not bytes.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use taskwin::validate::{FormRejection, validate_form};
use taskwin_proto::MAX_TITLE_LENGTH;

/// Strategy for strings made only of whitespace.
fn blank() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![' ', '\t', '\n', '\r']), 0..16)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn blank_title_never_accepted(title in blank(), description in ".{0,64}") {
        prop_assert_eq!(
            validate_form(&title, &description, MAX_TITLE_LENGTH),
            Err(FormRejection::TitleRequired)
        );
    }

    #[test]
    fn accepted_fields_are_trimmed(
        pad in blank(),
        core in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,40}[a-zA-Z0-9]",
        description in ".{0,64}",
    ) {
        let title = format!("{pad}{core}{pad}");
        let body = validate_form(&title, &description, MAX_TITLE_LENGTH).unwrap();
        prop_assert_eq!(body.title, core);
        prop_assert_eq!(body.description, description.trim());
    }

    #[test]
    fn limit_counts_characters(len in 1usize..40, max in 1usize..40) {
        let title = "\u{e9}".repeat(len);
        let result = validate_form(&title, "", max);
        if len <= max {
            prop_assert_eq!(result.map(|b| b.title), Ok(title));
        } else {
            prop_assert_eq!(result, Err(FormRejection::TitleTooLong { max }));
        }
    }
}
