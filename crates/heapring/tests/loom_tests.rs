//! Loom-based concurrency tests for the blocking handoff protocols.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings. The real buffer types
//! are built on `std::sync`, so we model the two protocols here with loom's
//! primitives directly, using tiny capacities to keep the state space
//! manageable.

#![cfg(feature = "loom")]

use loom::sync::{Arc, Condvar, Mutex};
use loom::thread;
use std::collections::VecDeque;

/// Counting semaphore modeled on loom primitives, same shape as the crate's.
struct LoomSemaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl LoomSemaphore {
    fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    fn acquire(&self) {
        let mut permits = self.permits.lock().unwrap();
        while *permits == 0 {
            permits = self.available.wait(permits).unwrap();
        }
        *permits -= 1;
    }

    fn release(&self) {
        let mut permits = self.permits.lock().unwrap();
        *permits += 1;
        drop(permits);
        self.available.notify_one();
    }
}

/// The counting-semaphore protocol: wait outside the lock, short critical
/// section for the slot update.
struct SemaphoreQueue {
    free: LoomSemaphore,
    filled: LoomSemaphore,
    slots: Mutex<VecDeque<u32>>,
}

impl SemaphoreQueue {
    fn new(capacity: usize) -> Self {
        Self {
            free: LoomSemaphore::new(capacity),
            filled: LoomSemaphore::new(0),
            slots: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn enqueue(&self, value: u32) {
        self.free.acquire();
        self.slots.lock().unwrap().push_back(value);
        self.filled.release();
    }

    fn dequeue(&self) -> u32 {
        self.filled.acquire();
        let value = self.slots.lock().unwrap().pop_front().unwrap();
        self.free.release();
        value
    }
}

#[test]
fn loom_semaphore_protocol_fifo() {
    loom::model(|| {
        let queue = Arc::new(SemaphoreQueue::new(1));

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                queue.enqueue(0);
                queue.enqueue(1);
            })
        };

        assert_eq!(queue.dequeue(), 0);
        assert_eq!(queue.dequeue(), 1);

        producer.join().unwrap();
    });
}

/// The condition-variable protocol: one mutex, one condvar for both roles,
/// predicate re-checked in a `while` loop after every wake.
struct CondvarQueue {
    slots: Mutex<VecDeque<u32>>,
    cond: Condvar,
    capacity: usize,
}

impl CondvarQueue {
    fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(VecDeque::with_capacity(capacity)),
            cond: Condvar::new(),
            capacity,
        }
    }

    fn enqueue(&self, value: u32) {
        let mut slots = self.slots.lock().unwrap();
        while slots.len() == self.capacity {
            slots = self.cond.wait(slots).unwrap();
        }
        slots.push_back(value);
        drop(slots);
        self.cond.notify_one();
    }

    fn dequeue(&self) -> u32 {
        let mut slots = self.slots.lock().unwrap();
        let value = loop {
            match slots.pop_front() {
                Some(value) => break value,
                None => slots = self.cond.wait(slots).unwrap(),
            }
        };
        drop(slots);
        self.cond.notify_one();
        value
    }
}

#[test]
fn loom_condvar_protocol_fifo() {
    loom::model(|| {
        let queue = Arc::new(CondvarQueue::new(1));

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                queue.enqueue(0);
                queue.enqueue(1);
            })
        };

        assert_eq!(queue.dequeue(), 0);
        assert_eq!(queue.dequeue(), 1);

        producer.join().unwrap();
    });
}
