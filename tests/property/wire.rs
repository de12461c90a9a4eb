//! Property tests for the JSON wire layer.
//!
//! 1. Arbitrary bytes never panic any decoder.
//! 2. Any task survives encode → decode.
//! 3. A `detail` body is recovered for any non-blank message.

#![allow(clippy::unwrap_used)]

use chrono::DateTime;
use proptest::prelude::*;
use taskwin_proto::codec;
use taskwin_proto::{ErrorDetail, Task, TaskId};

/// Strategy for tasks with optional whole-second creation times.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<u64>(),
        "[a-zA-Z0-9 ]{1,64}",
        ".{0,128}",
        any::<bool>(),
        prop::option::of(0i64..4_102_444_800),
    )
        .prop_map(|(id, title, description, completed, secs)| Task {
            id: TaskId::new(id),
            title,
            description,
            completed,
            created_at: secs.and_then(|s| DateTime::from_timestamp(s, 0)),
        })
}

proptest! {
    #[test]
    fn random_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = codec::decode_task(&bytes);
        let _ = codec::decode_task_list(&bytes);
        let _ = codec::failure_detail(&bytes);
    }

    #[test]
    fn task_survives_round_trip(task in arb_task()) {
        let bytes = codec::encode(&task).unwrap();
        prop_assert_eq!(codec::decode_task(&bytes).unwrap(), task);
    }

    #[test]
    fn task_list_preserves_order(tasks in prop::collection::vec(arb_task(), 0..8)) {
        let bytes = codec::encode(&tasks).unwrap();
        prop_assert_eq!(codec::decode_task_list(&bytes).unwrap(), tasks);
    }

    #[test]
    fn detail_is_recovered(message in "[a-zA-Z][a-zA-Z .]{0,63}") {
        let bytes = codec::encode(&ErrorDetail::new(message.clone())).unwrap();
        prop_assert_eq!(codec::failure_detail(&bytes), Some(message));
    }
}
