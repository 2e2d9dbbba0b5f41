//! Property-based tests over the buffer's delivery guarantees.
//!
//! For any capacity, pool size, and record count in range, the consumer must
//! observe exactly the enqueued sequence: FIFO order, no loss, no
//! duplication, and the unread count bounded by capacity throughout.

use heapring::{tasks, Cell, Config, MemorySink, RingBuffer, Segment, Strategy};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn delivered_payloads(config: Config, records: usize) -> Vec<u32> {
    let buffer = Arc::new(RingBuffer::new(config).unwrap());
    let (sink, _) = tasks::run_pipeline(buffer, records, MemorySink::new()).unwrap();
    sink.cells().iter().map(|c| c.payload).collect()
}

proptest! {
    /// Exact delivery for the semaphore strategy across capacities.
    #[test]
    fn prop_exact_delivery_semaphore(
        capacity_bits in 0u32..7,
        records in 0usize..300,
    ) {
        let config = Config::single(1 << capacity_bits);
        let payloads = delivered_payloads(config, records);
        prop_assert_eq!(payloads, (0..records as u32).collect::<Vec<_>>());
    }

    /// Exact delivery for the condition-variable strategy.
    #[test]
    fn prop_exact_delivery_condvar(
        capacity_bits in 0u32..7,
        records in 0usize..300,
    ) {
        let config = Config::single(1 << capacity_bits).with_strategy(Strategy::CondVar);
        let payloads = delivered_payloads(config, records);
        prop_assert_eq!(payloads, (0..records as u32).collect::<Vec<_>>());
    }

    /// Exact delivery through the segment pool, for arbitrary (including
    /// non-power-of-two) segment capacities and pool sizes.
    #[test]
    fn prop_exact_delivery_pooled(
        capacity in 1usize..12,
        pool_size in 2usize..5,
        records in 0usize..300,
    ) {
        let config = Config::pooled(capacity, pool_size);
        let payloads = delivered_payloads(config, records);
        prop_assert_eq!(payloads, (0..records as u32).collect::<Vec<_>>());
    }

    /// Pool handoffs are full segments except for a final flushed partial.
    #[test]
    fn prop_pool_handoff_sizes(
        capacity in 1usize..10,
        pool_size in 2usize..4,
        records in 1usize..200,
    ) {
        let buffer = Arc::new(RingBuffer::new(Config::pooled(capacity, pool_size)).unwrap());

        let producer = {
            let buffer = Arc::clone(&buffer);
            std::thread::spawn(move || {
                for i in 0..records {
                    buffer.enqueue(Cell::new(Duration::ZERO, i as u32));
                }
                buffer.flush();
            })
        };

        let mut sizes = Vec::new();
        let mut seen = 0;
        while seen < records {
            let batch = buffer.next_batch();
            sizes.push(batch.len());
            seen += batch.len();
        }
        producer.join().unwrap();

        let full = records / capacity;
        let remainder = records % capacity;
        let mut expected = vec![capacity; full];
        if remainder > 0 {
            expected.push(remainder);
        }
        prop_assert_eq!(sizes, expected);
    }

    /// The unread count of a segment never exceeds its capacity under any
    /// single-threaded interleaving of the blocking-agnostic primitives.
    #[test]
    fn prop_segment_unread_bounded(
        capacity_bits in 0u32..6,
        ops in prop::collection::vec(prop::bool::ANY, 1..200),
    ) {
        let capacity = 1usize << capacity_bits;
        let mut segment = Segment::new(capacity);
        let mut written = 0u32;
        let mut read = 0u32;

        for write_op in ops {
            if write_op {
                if let Some(slot) = segment.try_reserve_slot() {
                    segment.commit_write(slot, Cell::new(Duration::ZERO, written));
                    written += 1;
                }
            } else if let Some(slot) = segment.try_take_slot() {
                let cell = segment.commit_read(slot);
                prop_assert_eq!(cell.payload, read);
                read += 1;
            }

            prop_assert!(segment.len() <= capacity);
            prop_assert_eq!(segment.len() as u32, written - read);
        }
    }
}
