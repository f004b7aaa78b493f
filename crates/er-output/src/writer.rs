//! The `OutputWriter` trait implemented by all backend writers.

use er_sim::Snapshot;

use crate::{OutputResult, StepRow};

/// Trait implemented by the CSV and JSON-lines writers.
///
/// Errors are returned to [`SimOutputObserver`][crate::SimOutputObserver],
/// which keeps the first one for [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one step summary row.
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()>;

    /// Write whatever the backend keeps from a full snapshot.
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
