use std::fmt;
use std::time::Duration;

/// One fixed-size record passed through the buffer.
///
/// A cell pairs a monotonic capture timestamp with a 32-bit sample value
/// (e.g. a heap size snapshot). Cells are immutable once written and are
/// copied by value on enqueue/dequeue; no pointers change hands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    /// Monotonic time point, as elapsed time since the sampler's origin.
    pub timestamp: Duration,
    /// Sample value recorded at `timestamp`.
    pub payload: u32,
}

impl Cell {
    /// Creates a cell from a timestamp and payload.
    #[inline]
    pub const fn new(timestamp: Duration, payload: u32) -> Self {
        Self { timestamp, payload }
    }
}

/// Log-line rendering: `"<seconds>.<nanoseconds>, <payload>"`.
///
/// Nanoseconds are zero-padded to nine digits so the fractional part is
/// unambiguous in the emitted CSV.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}, {}",
            self.timestamp.as_secs(),
            self.timestamp.subsec_nanos(),
            self.payload
        )
    }
}
