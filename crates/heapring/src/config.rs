use crate::BufferError;

/// Blocking discipline used by the single-segment buffer variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Two counting semaphores (free slots / filled slots) plus a short-hold
    /// mutex around cursor mutation. The blocking wait happens outside the
    /// lock, so a stalled peer never holds it.
    #[default]
    Semaphore,
    /// One mutex and one condition variable shared by both roles, with
    /// `while`-loop predicate re-checks guarding every wait.
    CondVar,
}

/// Configuration for a [`RingBuffer`](crate::RingBuffer).
///
/// With `pool_size == 1` the buffer is a single circular segment whose
/// blocking behavior is chosen by `strategy`. With `pool_size >= 2` the
/// buffer batches: whole filled segments are handed to the consumer through
/// a "segment ready" semaphore, amortizing synchronization per segment
/// instead of per cell.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of cells per segment.
    ///
    /// Must be a non-zero power of two when `pool_size == 1`: slot indices
    /// are computed as `cursor & (capacity - 1)`. Pool segments fill
    /// front-to-back and reset before reuse, so any capacity >= 1 works
    /// when `pool_size >= 2`.
    pub capacity: usize,
    /// Number of segments rotated between the producer and the consumer.
    pub pool_size: usize,
    /// Blocking discipline for the single-segment variants. Ignored when
    /// `pool_size >= 2` (the pool always synchronizes per segment).
    pub strategy: Strategy,
}

impl Config {
    /// Single-segment configuration with the default (semaphore) strategy.
    pub const fn single(capacity: usize) -> Self {
        Self {
            capacity,
            pool_size: 1,
            strategy: Strategy::Semaphore,
        }
    }

    /// Batching configuration: `pool_size` segments of `capacity` cells each.
    pub const fn pooled(capacity: usize, pool_size: usize) -> Self {
        Self {
            capacity,
            pool_size,
            strategy: Strategy::Semaphore,
        }
    }

    /// Sets the blocking strategy for the single-segment variants.
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the index mask for cursor wraparound.
    ///
    /// Only meaningful when `capacity` is a power of two, which
    /// [`validate`](Self::validate) guarantees for the masked variants.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.capacity as u64 - 1
    }

    /// Checks the construction preconditions.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityMisconfigured`] if the capacity is zero, or not
    /// a power of two in single-segment mode; [`BufferError::PoolMisconfigured`]
    /// if the pool is empty.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.pool_size == 0 {
            return Err(BufferError::PoolMisconfigured {
                pool_size: self.pool_size,
            });
        }
        let pow2_required = self.pool_size == 1;
        if self.capacity == 0 || (pow2_required && !self.capacity.is_power_of_two()) {
            return Err(BufferError::CapacityMisconfigured {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::single(8192)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_capacities_accepted() {
        for capacity in [1, 2, 64, 16384] {
            assert!(Config::single(capacity).validate().is_ok());
        }
    }

    #[test]
    fn test_non_power_of_two_rejected_for_single_segment() {
        for capacity in [0, 3, 6, 100] {
            assert_eq!(
                Config::single(capacity).validate(),
                Err(BufferError::CapacityMisconfigured { capacity })
            );
        }
    }

    #[test]
    fn test_pool_allows_any_positive_capacity() {
        assert!(Config::pooled(3, 2).validate().is_ok());
        assert!(Config::pooled(7, 5).validate().is_ok());
        assert_eq!(
            Config::pooled(0, 2).validate(),
            Err(BufferError::CapacityMisconfigured { capacity: 0 })
        );
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert_eq!(
            Config::pooled(64, 0).validate(),
            Err(BufferError::PoolMisconfigured { pool_size: 0 })
        );
    }

    #[test]
    fn test_mask() {
        assert_eq!(Config::single(64).mask(), 63);
        assert_eq!(Config::single(1).mask(), 0);
    }
}
