//! heapring - Bounded Blocking SPSC Ring Buffer
//!
//! A shared-memory circular buffer that hands timestamped, fixed-size
//! records from one producer thread to one consumer thread without
//! unbounded memory growth. A fast producer (e.g. a heap sampler) is
//! decoupled from a slower consumer (e.g. a log writer): the producer
//! blocks when the buffer is full, the consumer blocks when it is empty,
//! and no record is ever dropped, duplicated, or reordered.
//!
//! # Synchronization variants
//!
//! - **Counting semaphores** ([`Strategy::Semaphore`]): one semaphore counts
//!   free slots, one counts filled slots; a short-hold mutex protects the
//!   cursor update, and the blocking wait happens outside it.
//! - **Condition variable** ([`Strategy::CondVar`]): one mutex and one
//!   condvar serve both roles, with spurious-wake-safe predicate loops.
//! - **Segment pool** (`pool_size >= 2`): whole buffer segments rotate
//!   between the roles, amortizing synchronization over a segment's worth
//!   of cells instead of signaling per cell.
//!
//! # Example
//!
//! ```
//! use heapring::{tasks, Config, MemorySink, RingBuffer};
//! use std::sync::Arc;
//!
//! let buffer = Arc::new(RingBuffer::new(Config::pooled(64, 2)).unwrap());
//! let (sink, report) = tasks::run_pipeline(buffer, 1000, MemorySink::new()).unwrap();
//!
//! assert_eq!(sink.cells().len(), 1000);
//! println!("producer finished in {:?}", report.producer_elapsed);
//! ```

mod buffer;
mod cell;
mod config;
mod error;
mod invariants;
mod pool;
mod segment;
mod semaphore;
mod sink;
mod strategy;
pub mod tasks;

pub use buffer::{Batch, RingBuffer};
pub use cell::Cell;
pub use config::{Config, Strategy};
pub use error::BufferError;
pub use pool::{SegmentBatch, SegmentPool, SegmentState};
pub use segment::Segment;
pub use sink::{MemorySink, RecordSink, WriterSink};
pub use strategy::{CondvarStrategy, SemaphoreStrategy, SyncStrategy};
pub use tasks::{run_pipeline, RunReport};
