use std::sync::{Condvar, Mutex, PoisonError};

/// Counting semaphore built from a mutex and a condition variable.
///
/// The standard library has no blocking counting semaphore, so we build the
/// classic one: the permit count lives under a mutex and waiters block on a
/// condition variable until a permit appears. The wait loop re-checks the
/// count after every wakeup, so spurious wakes are absorbed here and never
/// observed by callers.
///
/// With one producer and one consumer there is at most one waiter per
/// semaphore, so first-blocked-first-woken fairness questions do not arise;
/// callers must not rely on wakeup order beyond that.
#[derive(Debug)]
pub(crate) struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// Creates a semaphore holding `permits` initial permits.
    pub(crate) fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available, then takes it.
    pub(crate) fn acquire(&self) {
        let mut permits = self
            .permits
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
    }

    /// Returns a permit and wakes one waiter.
    pub(crate) fn release(&self) {
        let mut permits = self
            .permits
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *permits += 1;
        drop(permits);
        self.available.notify_one();
    }
}
