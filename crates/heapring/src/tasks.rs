//! Producer/consumer thread wiring.
//!
//! Each task is one long-running OS thread: the producer stamps and enqueues
//! a configured number of cells, the consumer drains them into a
//! [`RecordSink`]. Both record wall-clock elapsed time against a shared
//! monotonic origin so a run can be compared across buffer configurations.
//!
//! Completion is driven by the expected record count: the consumer stops
//! after delivering exactly `records` cells. There is no polling of
//! semaphore counts or other synchronization internals to detect the end of
//! a run.

use crate::{Cell, RecordSink, RingBuffer};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Wall-clock timings of one completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    /// Records driven through the buffer.
    pub records: usize,
    /// Time from origin until the producer finished its last enqueue (and
    /// flushed the final partial segment in pool mode).
    pub producer_elapsed: Duration,
    /// Time from origin until the consumer delivered the last cell.
    pub consumer_elapsed: Duration,
}

/// Spawns the producer thread: stamps and enqueues `records` cells with
/// payloads `0..records`, flushes, and reports its elapsed time.
pub fn spawn_producer(
    buffer: Arc<RingBuffer>,
    records: usize,
    origin: Instant,
) -> JoinHandle<Duration> {
    thread::spawn(move || {
        for i in 0..records {
            buffer.enqueue(Cell::new(origin.elapsed(), i as u32));
        }
        // Publish the final partial segment so the tail of the run is
        // delivered (no-op outside pool mode).
        buffer.flush();
        origin.elapsed()
    })
}

/// Spawns the consumer thread: drains batches into `sink` until exactly
/// `records` cells have been delivered, then reports its elapsed time and
/// returns the sink.
pub fn spawn_consumer<S>(
    buffer: Arc<RingBuffer>,
    records: usize,
    mut sink: S,
    origin: Instant,
) -> JoinHandle<io::Result<(S, Duration)>>
where
    S: RecordSink + Send + 'static,
{
    thread::spawn(move || {
        let mut delivered = 0;
        while delivered < records {
            let batch = buffer.next_batch();
            sink.emit_batch(batch.cells())?;
            delivered += batch.len();
        }
        Ok((sink, origin.elapsed()))
    })
}

/// Drives `records` cells through the buffer with one producer and one
/// consumer thread, returning the sink and the run timings.
pub fn run_pipeline<S>(
    buffer: Arc<RingBuffer>,
    records: usize,
    sink: S,
) -> io::Result<(S, RunReport)>
where
    S: RecordSink + Send + 'static,
{
    let origin = Instant::now();

    let producer = spawn_producer(Arc::clone(&buffer), records, origin);
    let consumer = spawn_consumer(buffer, records, sink, origin);

    let producer_elapsed = producer.join().expect("producer thread panicked");
    let (sink, consumer_elapsed) = consumer.join().expect("consumer thread panicked")?;

    Ok((
        sink,
        RunReport {
            records,
            producer_elapsed,
            consumer_elapsed,
        },
    ))
}
