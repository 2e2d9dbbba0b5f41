//! Log-sink collaborators for the consumer side.
//!
//! The buffer core never writes files itself; the drain path hands ordered
//! cell sequences to a [`RecordSink`]. The persisted layout is one line per
//! cell, `"<seconds>.<nanoseconds>, <payload>"`, in delivery order, flushed
//! unbuffered.

use crate::Cell;
use std::io::{self, Write};

/// Receives every cell exactly once, in FIFO delivery order.
pub trait RecordSink {
    /// Emits a single cell.
    fn emit(&mut self, cell: &Cell) -> io::Result<()>;

    /// Emits one drained batch in order. Invoked once per segment handoff in
    /// pool mode.
    fn emit_batch(&mut self, cells: &[Cell]) -> io::Result<()> {
        for cell in cells {
            self.emit(cell)?;
        }
        Ok(())
    }
}

/// Line-oriented sink over any writer, flushed after every emission.
///
/// Flushing per line keeps the log file current: a crash loses at most the
/// cell being written.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwraps the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for WriterSink<W> {
    fn emit(&mut self, cell: &Cell) -> io::Result<()> {
        writeln!(self.writer, "{cell}")?;
        self.writer.flush()
    }

    fn emit_batch(&mut self, cells: &[Cell]) -> io::Result<()> {
        // One flush per batch: the handoff is the durability boundary here.
        for cell in cells {
            writeln!(self.writer, "{cell}")?;
        }
        self.writer.flush()
    }
}

/// In-memory sink collecting every delivered cell, for tests and benches.
#[derive(Debug, Default)]
pub struct MemorySink {
    cells: Vec<Cell>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All cells delivered so far, in delivery order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Consumes the sink, returning the delivered cells.
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, cell: &Cell) -> io::Result<()> {
        self.cells.push(*cell);
        Ok(())
    }
}
