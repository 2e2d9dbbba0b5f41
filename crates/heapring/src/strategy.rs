use crate::semaphore::Semaphore;
use crate::{Cell, Segment};
use crossbeam_utils::CachePadded;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Blocking enqueue/dequeue contract shared by the single-segment variants.
///
/// The segment's reserve/commit primitives are blocking-agnostic; a strategy
/// supplies the blocking policy around them. Both implementations serve
/// exactly one producer thread and one consumer thread, block indefinitely
/// (no cancellation or timeout), and deliver cells in strict FIFO order.
pub trait SyncStrategy: Send + Sync {
    /// Enqueues a cell, blocking while the segment is full. This is the
    /// backpressure point: an unbounded producer stalls here whenever the
    /// consumer falls behind.
    fn enqueue(&self, cell: Cell);

    /// Dequeues the oldest cell, blocking while the segment is empty.
    fn dequeue(&self) -> Cell;

    /// Segment capacity in cells.
    fn capacity(&self) -> usize;

    /// Current number of unread cells, always in `[0, capacity]`.
    fn len(&self) -> usize;

    /// Returns true if no unread cells are buffered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locks a segment, continuing through poison.
///
/// Every critical section here leaves the segment consistent at each
/// statement boundary (a panic before a cursor advance simply leaves the
/// write unpublished), so a poisoned lock carries no torn state.
fn lock(segment: &Mutex<Segment>) -> MutexGuard<'_, Segment> {
    segment.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// COUNTING-SEMAPHORE STRATEGY
// =============================================================================

/// Two counting semaphores plus a short-hold mutex.
///
/// `free_slots` (initially `capacity`) counts open slots; `filled_slots`
/// (initially 0) counts unread cells. A caller first acquires a permit from
/// the semaphore for its role (that is where it blocks) and only then takes
/// the mutex for the cursor update and cell copy. The wait always happens
/// outside the lock: a slow consumer never holds the lock while the producer
/// waits, and vice versa.
pub struct SemaphoreStrategy {
    /// Permits for open slots; the producer's blocking point.
    free_slots: CachePadded<Semaphore>,
    /// Permits for unread cells; the consumer's blocking point.
    filled_slots: CachePadded<Semaphore>,
    segment: Mutex<Segment>,
}

impl SemaphoreStrategy {
    /// Creates the strategy over a fresh segment of `capacity` cells.
    pub fn new(capacity: usize) -> Self {
        Self {
            free_slots: CachePadded::new(Semaphore::new(capacity)),
            filled_slots: CachePadded::new(Semaphore::new(0)),
            segment: Mutex::new(Segment::new(capacity)),
        }
    }
}

impl SyncStrategy for SemaphoreStrategy {
    fn enqueue(&self, cell: Cell) {
        // Wait for an open slot outside the lock.
        self.free_slots.acquire();

        {
            let mut segment = lock(&self.segment);
            // The free_slots permit means the segment cannot be full here.
            let slot = segment
                .try_reserve_slot()
                .expect("free permit held for a full segment");
            segment.commit_write(slot, cell);
        }

        self.filled_slots.release();
    }

    fn dequeue(&self) -> Cell {
        // Wait for an unread cell outside the lock.
        self.filled_slots.acquire();

        let cell = {
            let mut segment = lock(&self.segment);
            let slot = segment
                .try_take_slot()
                .expect("filled permit held for an empty segment");
            segment.commit_read(slot)
        };

        self.free_slots.release();
        cell
    }

    fn capacity(&self) -> usize {
        lock(&self.segment).capacity()
    }

    fn len(&self) -> usize {
        lock(&self.segment).len()
    }
}

// =============================================================================
// CONDITION-VARIABLE STRATEGY
// =============================================================================

/// One mutex and one condition variable serving both roles.
///
/// Waits happen inside the lock (the condvar releases it while blocked) and
/// the full/empty predicate is re-checked in a `while` loop after every wake.
/// The re-check is mandatory, not an optimization: a single condvar serves
/// both roles, so any signal can wake the "wrong" kind of waiter, and the OS
/// may wake a waiter spuriously with no signal at all.
pub struct CondvarStrategy {
    segment: Mutex<Segment>,
    cond: Condvar,
}

impl CondvarStrategy {
    /// Creates the strategy over a fresh segment of `capacity` cells.
    pub fn new(capacity: usize) -> Self {
        Self {
            segment: Mutex::new(Segment::new(capacity)),
            cond: Condvar::new(),
        }
    }
}

impl SyncStrategy for CondvarStrategy {
    fn enqueue(&self, cell: Cell) {
        let mut segment = lock(&self.segment);
        let slot = loop {
            match segment.try_reserve_slot() {
                Some(slot) => break slot,
                None => {
                    segment = self
                        .cond
                        .wait(segment)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        };
        segment.commit_write(slot, cell);
        drop(segment);

        // Wake a possibly-blocked consumer.
        self.cond.notify_one();
    }

    fn dequeue(&self) -> Cell {
        let mut segment = lock(&self.segment);
        let slot = loop {
            match segment.try_take_slot() {
                Some(slot) => break slot,
                None => {
                    segment = self
                        .cond
                        .wait(segment)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        };
        let cell = segment.commit_read(slot);
        drop(segment);

        // Wake a possibly-blocked producer.
        self.cond.notify_one();
        cell
    }

    fn capacity(&self) -> usize {
        lock(&self.segment).capacity()
    }

    fn len(&self) -> usize {
        lock(&self.segment).len()
    }
}
