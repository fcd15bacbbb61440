// src/progress.rs
use crate::record::Status;

/// Lightweight progress reporting for a run over the input rows.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of rows that will be processed.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called once per row, in input order, after its record exists.
    fn item_done(&mut self, _index: usize, _identifier: &str, _status: &Status) {}

    /// Called at the end of the run.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
