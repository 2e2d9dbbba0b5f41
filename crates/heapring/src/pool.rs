use crate::invariants::debug_assert_segment_state;
use crate::semaphore::Semaphore;
use crate::{Cell, Segment};
use crossbeam_utils::CachePadded;
use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Lifecycle of one pool segment.
///
/// Segments cycle `Empty → Filling → Full → Draining → Empty`. Exactly one
/// segment is `Filling` at any time; a `Draining` segment is owned by the
/// consumer and is never written until it has been reset back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Recycled and available to the producer.
    Empty,
    /// The active segment, receiving writes.
    Filling,
    /// Published to the consumer, waiting to be drained.
    Full,
    /// Being emitted to the sink by the consumer.
    Draining,
}

struct PoolState {
    segments: Vec<Segment>,
    states: Vec<SegmentState>,
    /// Index of the segment currently in `Filling` state.
    active: usize,
    /// Published segments in handoff order. Drained strictly front-to-back,
    /// which is what preserves FIFO across segment boundaries.
    ready: VecDeque<usize>,
}

impl PoolState {
    #[cfg(debug_assertions)]
    fn assert_single_filling(&self) {
        let filling = self
            .states
            .iter()
            .filter(|s| **s == SegmentState::Filling)
            .count();
        debug_assert!(filling == 1, "{filling} segments in Filling state");
    }
}

/// Batch coordinator: rotates N segments between the producer and consumer.
///
/// The producer fills the active segment cell by cell with no per-cell
/// signaling; only when a segment fills (or is flushed) does it publish the
/// whole segment through the `segment_ready` semaphore. This amortizes
/// synchronization cost over `capacity` cells. Pool segments fill linearly
/// and reset on recycle, so their capacity need not be a power of two.
pub struct SegmentPool {
    state: Mutex<PoolState>,
    /// Counts published segments; the consumer's blocking point.
    segment_ready: CachePadded<Semaphore>,
    /// Wakes the producer when a drained segment returns to `Empty`.
    segment_free: Condvar,
    /// Cells drained but not yet handed out through `dequeue`.
    pending: Mutex<VecDeque<Cell>>,
}

fn lock(state: &Mutex<PoolState>) -> MutexGuard<'_, PoolState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SegmentPool {
    /// Creates a pool of `pool_size` segments holding `capacity` cells each.
    ///
    /// Preconditions (`capacity >= 1`, `pool_size >= 1`) are checked by
    /// `Config::validate` before construction.
    pub fn new(capacity: usize, pool_size: usize) -> Self {
        let segments = (0..pool_size).map(|_| Segment::new(capacity)).collect();
        let mut states = vec![SegmentState::Empty; pool_size];
        states[0] = SegmentState::Filling;

        Self {
            state: Mutex::new(PoolState {
                segments,
                states,
                active: 0,
                ready: VecDeque::with_capacity(pool_size),
            }),
            segment_ready: CachePadded::new(Semaphore::new(0)),
            segment_free: Condvar::new(),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the per-segment capacity in cells.
    pub fn capacity(&self) -> usize {
        lock(&self.state).segments[0].capacity()
    }

    /// Returns the number of segments in the pool.
    pub fn pool_size(&self) -> usize {
        lock(&self.state).segments.len()
    }

    /// Snapshot of every segment's lifecycle state, in pool order.
    pub fn segment_states(&self) -> Vec<SegmentState> {
        lock(&self.state).states.clone()
    }

    /// Appends a cell to the active segment, publishing the segment once it
    /// fills. Blocks when no recycled segment is available for rotation:
    /// backpressure, never overwriting a segment the consumer still owns.
    pub fn enqueue(&self, cell: Cell) {
        let mut state = lock(&self.state);
        let active = state.active;
        debug_assert_segment_state!(state.states[active], SegmentState::Filling);

        if state.segments[active].fill(cell) {
            let state = self.publish_active(state);
            drop(state);
        }
    }

    /// Publishes a partially filled active segment so the tail of a run
    /// reaches the consumer. No-op if the active segment is empty.
    pub fn flush(&self) {
        let state = lock(&self.state);
        if state.segments[state.active].is_empty() {
            return;
        }
        let state = self.publish_active(state);
        drop(state);
    }

    /// Blocks until a published segment is available and takes ownership of
    /// it for draining. The segment stays `Draining`, unwritable by the
    /// producer, until the returned batch is dropped.
    pub fn recv_batch(&self) -> SegmentBatch<'_> {
        self.segment_ready.acquire();

        let mut state = lock(&self.state);
        let index = state
            .ready
            .pop_front()
            .expect("ready permit without a published segment");
        debug_assert_segment_state!(state.states[index], SegmentState::Full);
        state.states[index] = SegmentState::Draining;

        // Copy the cells out in commit order; the cheap copy keeps the
        // critical section to a memcpy.
        let cells = state.segments[index].filled().to_vec();
        drop(state);

        SegmentBatch {
            pool: self,
            index,
            cells,
        }
    }

    /// Blocking per-cell dequeue over drained batches.
    ///
    /// Drains a segment whenever the pending queue runs dry; delivery order
    /// is the producer's commit order because segments are drained strictly
    /// in the order they were published.
    pub fn dequeue(&self) -> Cell {
        loop {
            {
                let mut pending = self
                    .pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(cell) = pending.pop_front() {
                    return cell;
                }
            }

            let batch = self.recv_batch();
            let mut pending = self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            pending.extend(batch.iter().copied());
        }
    }

    /// Marks the active segment `Full`, hands it to the consumer, and rotates
    /// to the next segment, blocking until that segment is `Empty`.
    fn publish_active<'a>(
        &self,
        mut state: MutexGuard<'a, PoolState>,
    ) -> MutexGuard<'a, PoolState> {
        let current = state.active;
        debug_assert_segment_state!(state.states[current], SegmentState::Filling);
        state.states[current] = SegmentState::Full;
        state.ready.push_back(current);
        self.segment_ready.release();

        // True modulo, not a mask: the pool size need not be a power of two.
        let next = (current + 1) % state.segments.len();
        while state.states[next] != SegmentState::Empty {
            state = self
                .segment_free
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.states[next] = SegmentState::Filling;
        state.active = next;

        #[cfg(debug_assertions)]
        state.assert_single_filling();
        state
    }

    /// Recycles a drained segment: cursors back to zero, state to `Empty`,
    /// producer woken. Called from `SegmentBatch::drop`.
    fn recycle(&self, index: usize) {
        let mut state = lock(&self.state);
        debug_assert_segment_state!(state.states[index], SegmentState::Draining);
        state.segments[index].reset();
        state.states[index] = SegmentState::Empty;
        drop(state);

        self.segment_free.notify_one();
    }
}

/// One drained segment's cells, in commit order.
///
/// The source segment stays in `Draining` state while this batch is alive, so
/// a consumer emitting the cells to a slow sink keeps backpressure on the
/// producer. Dropping the batch recycles the segment.
pub struct SegmentBatch<'a> {
    pool: &'a SegmentPool,
    index: usize,
    cells: Vec<Cell>,
}

impl SegmentBatch<'_> {
    /// Index of the pool segment this batch was drained from.
    pub fn segment_index(&self) -> usize {
        self.index
    }

    /// Consumes the batch, returning the cells and recycling the segment.
    pub fn into_cells(self) -> Vec<Cell> {
        // Drop runs after the take; an empty Vec is left behind.
        let mut this = self;
        std::mem::take(&mut this.cells)
    }
}

impl Deref for SegmentBatch<'_> {
    type Target = [Cell];

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl Drop for SegmentBatch<'_> {
    fn drop(&mut self) {
        self.pool.recycle(self.index);
    }
}
