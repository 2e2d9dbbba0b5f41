//! Error types for buffer construction.
//!
//! Only misconfiguration is surfaced as an error. The two runtime conditions
//! the buffer encounters (all pool segments occupied, and spurious
//! condition-variable wakeups) are resolved locally by blocking and by
//! re-checking the wait predicate; neither ever reaches the caller.

use thiserror::Error;

/// Errors that can occur when constructing a [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Segment capacity is unusable for masked index wraparound.
    ///
    /// The per-cell variants compute slot indices as `cursor & (capacity - 1)`,
    /// which requires a power-of-two capacity. This is a hard precondition,
    /// checked once at construction.
    #[error("segment capacity {capacity} must be a non-zero power of two")]
    CapacityMisconfigured {
        /// The rejected capacity.
        capacity: usize,
    },

    /// The segment pool must hold at least one segment.
    #[error("segment pool size must be at least 1 (got {pool_size})")]
    PoolMisconfigured {
        /// The rejected pool size.
        pool_size: usize,
    },
}
