//! Debug assertion macros for the ring buffer cursor invariants.
//!
//! These checks run on every cursor mutation in debug builds and compile to
//! nothing in release builds. They catch protocol violations (a cursor moving
//! backwards, the ring overfilling, a peek outside the committed window)
//! before they can silently corrupt the cursors.

/// Assert that the committed count never exceeds capacity.
///
/// Invariant: `0 ≤ (write_cursor - read_cursor) ≤ capacity`
///
/// Used in: `commit_claimed()` after computing the new write cursor
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "ring overfilled: {} committed slots exceed capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that the read cursor never advances past the write cursor.
///
/// Invariant: `read_cursor ≤ write_cursor` (after pop)
///
/// Used in: `pop()` / `try_pop()` before storing the new read cursor
macro_rules! debug_assert_read_not_past_write {
    ($new_read:expr, $write:expr) => {
        debug_assert!(
            $new_read <= $write,
            "read cursor {} advanced past write cursor {}",
            $new_read,
            $write
        )
    };
}

/// Assert that a cursor only ever increases (monotonic progress).
///
/// Invariant: `new_value ≥ old_value`
///
/// Used in: `commit_claimed()` for the write cursor, `pop()` for the read cursor
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that a slot being read lies inside the committed window.
///
/// Invariant: `slot at seq s is initialized ⟺ read_cursor ≤ s < write_cursor`
///
/// Used in: `peek()` / `try_pop()` before `assume_init_*`
macro_rules! debug_assert_initialized_read {
    ($pos:expr, $write:expr) => {
        debug_assert!(
            $pos < $write,
            "reading slot at seq {} outside committed window (write cursor {})",
            $pos,
            $write
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_initialized_read;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_read_not_past_write;
