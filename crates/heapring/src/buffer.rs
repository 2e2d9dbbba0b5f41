use crate::pool::{SegmentBatch, SegmentPool, SegmentState};
use crate::strategy::{CondvarStrategy, SemaphoreStrategy, SyncStrategy};
use crate::{BufferError, Cell, Config, Strategy};

/// Dispatch between the per-cell strategies and the batching pool.
enum Variant {
    /// Single segment, per-cell blocking, strategy chosen at construction.
    Single(Box<dyn SyncStrategy>),
    /// Two or more segments handed off whole.
    Pooled(SegmentPool),
}

/// Bounded shared-memory circular buffer for one producer and one consumer.
///
/// The buffer never grows and never drops: a full buffer blocks the producer
/// (backpressure), an empty buffer blocks the consumer, and every cell is
/// delivered exactly once in FIFO order. Construct it once, wrap it in an
/// [`Arc`](std::sync::Arc), and hand clones to the two threads; there is no
/// ambient global state.
///
/// # Example
///
/// ```
/// use heapring::{Cell, Config, RingBuffer};
/// use std::time::Duration;
///
/// let buffer = RingBuffer::new(Config::single(64)).unwrap();
/// buffer.enqueue(Cell::new(Duration::from_millis(1), 42));
/// assert_eq!(buffer.dequeue().payload, 42);
/// ```
pub struct RingBuffer {
    variant: Variant,
    config: Config,
}

impl RingBuffer {
    /// Builds a buffer from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityMisconfigured`] for a zero capacity, or a
    /// non-power-of-two capacity in single-segment mode;
    /// [`BufferError::PoolMisconfigured`] for an empty pool.
    pub fn new(config: Config) -> Result<Self, BufferError> {
        config.validate()?;

        let variant = if config.pool_size >= 2 {
            Variant::Pooled(SegmentPool::new(config.capacity, config.pool_size))
        } else {
            match config.strategy {
                Strategy::Semaphore => {
                    Variant::Single(Box::new(SemaphoreStrategy::new(config.capacity)))
                }
                Strategy::CondVar => {
                    Variant::Single(Box::new(CondvarStrategy::new(config.capacity)))
                }
            }
        };

        Ok(Self { variant, config })
    }

    /// Returns the per-segment capacity in cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Returns the number of segments (1 outside pool mode).
    #[inline]
    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }

    /// Enqueues a cell, blocking while no capacity is available.
    pub fn enqueue(&self, cell: Cell) {
        match &self.variant {
            Variant::Single(strategy) => strategy.enqueue(cell),
            Variant::Pooled(pool) => pool.enqueue(cell),
        }
    }

    /// Dequeues the oldest cell, blocking while the buffer is empty.
    pub fn dequeue(&self) -> Cell {
        match &self.variant {
            Variant::Single(strategy) => strategy.dequeue(),
            Variant::Pooled(pool) => pool.dequeue(),
        }
    }

    /// Blocks until a batch of cells is ready and takes ownership of it.
    ///
    /// In pool mode this is the segment handoff: one full (or flushed)
    /// segment per call, and the segment stays unwritable until the batch is
    /// dropped. Outside pool mode the batch granularity is a single cell.
    pub fn next_batch(&self) -> Batch<'_> {
        match &self.variant {
            Variant::Single(strategy) => Batch::Cell(strategy.dequeue()),
            Variant::Pooled(pool) => Batch::Segment(pool.recv_batch()),
        }
    }

    /// Publishes a partially filled active segment to the consumer so the
    /// tail of a run reaches the sink. No-op outside pool mode (per-cell
    /// variants publish on every enqueue) or when nothing is pending.
    pub fn flush(&self) {
        if let Variant::Pooled(pool) = &self.variant {
            pool.flush();
        }
    }

    /// Snapshot of segment lifecycle states; `None` outside pool mode.
    pub fn segment_states(&self) -> Option<Vec<SegmentState>> {
        match &self.variant {
            Variant::Single(_) => None,
            Variant::Pooled(pool) => Some(pool.segment_states()),
        }
    }

    /// Current unread-cell count of the single segment; `None` in pool mode.
    pub fn unread(&self) -> Option<usize> {
        match &self.variant {
            Variant::Single(strategy) => Some(strategy.len()),
            Variant::Pooled(_) => None,
        }
    }
}

/// One blocking handoff from [`RingBuffer::next_batch`].
pub enum Batch<'a> {
    /// Per-cell variants deliver one cell at a time.
    Cell(Cell),
    /// Pool mode delivers a whole drained segment.
    Segment(SegmentBatch<'a>),
}

impl Batch<'_> {
    /// The delivered cells, in commit order.
    pub fn cells(&self) -> &[Cell] {
        match self {
            Batch::Cell(cell) => std::slice::from_ref(cell),
            Batch::Segment(batch) => batch,
        }
    }

    /// Number of cells in this handoff.
    pub fn len(&self) -> usize {
        self.cells().len()
    }

    /// Returns true if the handoff carries no cells.
    pub fn is_empty(&self) -> bool {
        self.cells().is_empty()
    }
}
