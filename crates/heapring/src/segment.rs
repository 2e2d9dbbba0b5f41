use crate::invariants::{
    debug_assert_bounded_count, debug_assert_monotonic, debug_assert_reader_not_past_writer,
    debug_assert_slot_matches_cursor,
};
use crate::Cell;

// =============================================================================
// CURSOR PROTOCOL
// =============================================================================
//
// A segment keeps two monotonically increasing u64 cursors instead of wrapped
// indices:
//
// - `writer_cursor`: next slot the producer will claim
// - `reader_cursor`: next slot the consumer will take
//
// Invariants (checked by the macros in `invariants.rs`):
//
// - `reader_cursor <= writer_cursor` always
// - unread count = `writer_cursor - reader_cursor`, in `[0, capacity]`
// - slot index = `cursor & (capacity - 1)`; capacity must be a power of two
//   for this masked wraparound (enforced at `Config::validate`)
//
// The cursors wrap via the mask, never via u64 overflow: at one cell per
// nanosecond a u64 cursor takes centuries to overflow, so overflow semantics
// are never observable to the consumer.
//
// A slot is owned exclusively by the producer from the moment its index is
// claimed until `writer_cursor` is incremented past it, and by the consumer
// from then until `reader_cursor` passes it. Every cursor mutation happens
// inside the caller's critical section, so a cell write becomes visible to
// the consumer only together with the cursor advance that publishes it.
//
// Pool segments use the linear fill path instead: cursors reset to zero on
// recycle and the writer never reaches `capacity` before the segment is
// handed off, so no wraparound (and no power-of-two capacity) is needed.
//
// =============================================================================

/// A fixed-capacity circular array of [`Cell`]s with monotonic cursors.
///
/// The four reserve/commit primitives are intentionally blocking-agnostic:
/// they only succeed or report `None` ("would block"), and the synchronization
/// strategy wrapping the segment decides how to wait.
#[derive(Debug)]
pub struct Segment {
    /// Fixed-size cell storage. `Box<[Cell]>` rather than `Vec<Cell>`: the
    /// allocation happens once at construction and never resizes.
    cells: Box<[Cell]>,
    /// Index mask, `capacity - 1`. Only used by the masked primitives.
    mask: u64,
    writer_cursor: u64,
    reader_cursor: u64,
}

impl Segment {
    /// Allocates a segment with all cells zeroed and cursors at zero.
    ///
    /// The masked per-cell primitives require a power-of-two capacity;
    /// [`Config::validate`](crate::Config::validate) enforces that before a
    /// buffer builds its segments. Pool segments fill linearly and may use
    /// any capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![Cell::default(); capacity].into_boxed_slice(),
            mask: capacity as u64 - 1,
            writer_cursor: 0,
            reader_cursor: 0,
        }
    }

    /// Returns the segment capacity in cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of unread cells.
    #[inline]
    pub fn len(&self) -> usize {
        (self.writer_cursor - self.reader_cursor) as usize
    }

    /// Returns true if there are no unread cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writer_cursor == self.reader_cursor
    }

    /// Returns true if every slot holds an unread cell.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    // ---------------------------------------------------------------------
    // PER-CELL PRIMITIVES (masked wraparound)
    // ---------------------------------------------------------------------

    /// Claims the next write slot, or `None` if the segment is full.
    #[inline]
    pub fn try_reserve_slot(&self) -> Option<u64> {
        if self.is_full() {
            None
        } else {
            Some(self.writer_cursor)
        }
    }

    /// Writes `cell` into the claimed slot and advances the writer cursor,
    /// publishing the cell to the consumer.
    pub fn commit_write(&mut self, slot: u64, cell: Cell) {
        debug_assert_slot_matches_cursor!(slot, self.writer_cursor);

        self.cells[(slot & self.mask) as usize] = cell;

        let new_writer = slot + 1;
        debug_assert_monotonic!("writer", self.writer_cursor, new_writer);
        debug_assert_bounded_count!((new_writer - self.reader_cursor) as usize, self.capacity());
        self.writer_cursor = new_writer;
    }

    /// Claims the next read slot, or `None` if the segment is empty.
    #[inline]
    pub fn try_take_slot(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.reader_cursor)
        }
    }

    /// Copies the cell out of the claimed slot and advances the reader
    /// cursor, releasing the slot back to the producer.
    pub fn commit_read(&mut self, slot: u64) -> Cell {
        debug_assert_slot_matches_cursor!(slot, self.reader_cursor);

        let cell = self.cells[(slot & self.mask) as usize];

        let new_reader = slot + 1;
        debug_assert_monotonic!("reader", self.reader_cursor, new_reader);
        debug_assert_reader_not_past_writer!(new_reader, self.writer_cursor);
        self.reader_cursor = new_reader;
        cell
    }

    // ---------------------------------------------------------------------
    // LINEAR FILL (segment pool)
    // ---------------------------------------------------------------------
    //
    // The pool hands whole segments between the roles, so a segment fills
    // front-to-back and is reset before reuse. The cursors double as fill
    // level here; no masking is involved.

    /// Appends a cell at the writer cursor. Returns true once the segment
    /// has become full and is ready for handoff.
    pub(crate) fn fill(&mut self, cell: Cell) -> bool {
        debug_assert!(!self.is_full(), "filling a segment past its capacity");

        self.cells[self.writer_cursor as usize] = cell;
        self.writer_cursor += 1;
        self.is_full()
    }

    /// The cells written since the last reset, in commit order.
    pub(crate) fn filled(&self) -> &[Cell] {
        &self.cells[self.reader_cursor as usize..self.writer_cursor as usize]
    }

    /// Resets both cursors to zero, recycling the segment for the producer.
    pub(crate) fn reset(&mut self) {
        self.writer_cursor = 0;
        self.reader_cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cell(payload: u32) -> Cell {
        Cell::new(Duration::ZERO, payload)
    }

    #[test]
    fn test_reserve_commit_roundtrip() {
        let mut seg = Segment::new(4);

        let slot = seg.try_reserve_slot().unwrap();
        seg.commit_write(slot, cell(10));
        assert_eq!(seg.len(), 1);

        let slot = seg.try_take_slot().unwrap();
        assert_eq!(seg.commit_read(slot).payload, 10);
        assert!(seg.is_empty());
    }

    #[test]
    fn test_reserve_fails_when_full() {
        let mut seg = Segment::new(2);
        for i in 0..2 {
            let slot = seg.try_reserve_slot().unwrap();
            seg.commit_write(slot, cell(i));
        }
        assert!(seg.is_full());
        assert!(seg.try_reserve_slot().is_none());
    }

    #[test]
    fn test_take_fails_when_empty() {
        let seg = Segment::new(2);
        assert!(seg.try_take_slot().is_none());
    }

    #[test]
    fn test_wraparound_preserves_fifo() {
        let mut seg = Segment::new(4);

        // Drive the cursors well past capacity to exercise the mask.
        let mut expected = 0u32;
        for round in 0..10u32 {
            for i in 0..4 {
                let slot = seg.try_reserve_slot().unwrap();
                seg.commit_write(slot, cell(round * 4 + i));
            }
            assert!(seg.is_full());
            for _ in 0..4 {
                let slot = seg.try_take_slot().unwrap();
                assert_eq!(seg.commit_read(slot).payload, expected);
                expected += 1;
            }
        }
        assert!(seg.is_empty());
    }

    #[test]
    fn test_capacity_one() {
        let mut seg = Segment::new(1);
        let slot = seg.try_reserve_slot().unwrap();
        seg.commit_write(slot, cell(99));
        assert!(seg.try_reserve_slot().is_none());
        let slot = seg.try_take_slot().unwrap();
        assert_eq!(seg.commit_read(slot).payload, 99);
    }

    #[test]
    fn test_linear_fill_and_reset() {
        let mut seg = Segment::new(3);
        assert!(!seg.fill(cell(1)));
        assert!(!seg.fill(cell(2)));
        assert!(seg.fill(cell(3)));

        let payloads: Vec<u32> = seg.filled().iter().map(|c| c.payload).collect();
        assert_eq!(payloads, [1, 2, 3]);

        seg.reset();
        assert!(seg.is_empty());
        assert!(seg.filled().is_empty());
    }
}
