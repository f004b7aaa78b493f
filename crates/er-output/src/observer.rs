//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use er_core::Tick;
use er_sim::{Metrics, SimObserver, Snapshot, StepReport};

use crate::row::StepRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes step summaries and snapshots to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  `run` does this on its own; `run_steps` does not.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_end(&mut self, report: &StepReport) {
        let result = self.writer.write_step(&StepRow::from_report(report));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let result = self.writer.write_snapshot(snapshot);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_step: Tick, _metrics: &Metrics) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
