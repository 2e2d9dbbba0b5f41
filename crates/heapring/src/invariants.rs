//! Debug assertion macros for buffer invariants.
//!
//! These are only active in debug builds (`debug_assert!`), so there is zero
//! overhead in release builds. They check the cursor and segment-state
//! discipline that makes corruption structurally impossible: a violation here
//! is always an implementation bug, never a runtime condition.

/// Assert that the unread-cell count stays within `[0, capacity]`.
///
/// **Invariant**: `0 <= (writer_cursor - reader_cursor) <= capacity`
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "unread count {} exceeds segment capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that a cursor only moves forward.
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} cursor decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that the reader never passes the writer.
///
/// **Invariant**: `reader_cursor <= writer_cursor` after every advance.
macro_rules! debug_assert_reader_not_past_writer {
    ($reader:expr, $writer:expr) => {
        debug_assert!(
            $reader <= $writer,
            "reader cursor {} advanced past writer cursor {}",
            $reader,
            $writer
        )
    };
}

/// Assert that a commit targets the cursor it claimed.
///
/// The reserve/commit split is blocking-agnostic, but a commit must pair with
/// the slot handed out by the matching reserve.
macro_rules! debug_assert_slot_matches_cursor {
    ($slot:expr, $cursor:expr) => {
        debug_assert!(
            $slot == $cursor,
            "committing slot {} but cursor is at {}",
            $slot,
            $cursor
        )
    };
}

/// Assert a segment state transition starts from the expected state.
///
/// **Invariant**: segments cycle `EMPTY → FILLING → FULL → DRAINING → EMPTY`;
/// in particular a segment is never written while it is being drained.
macro_rules! debug_assert_segment_state {
    ($actual:expr, $expected:expr) => {
        debug_assert!(
            $actual == $expected,
            "segment in state {:?}, expected {:?}",
            $actual,
            $expected
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_reader_not_past_writer;
pub(crate) use debug_assert_segment_state;
pub(crate) use debug_assert_slot_matches_cursor;
