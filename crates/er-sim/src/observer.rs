//! Simulation observer trait for progress reporting and data collection.

use er_core::Tick;

use crate::{Metrics, Snapshot, StepReport};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_steps`][crate::Sim::run_steps] at step boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: loss notifier
///
/// ```rust,ignore
/// struct Losses(Vec<VictimId>);
///
/// impl SimObserver for Losses {
///     fn on_step_end(&mut self, report: &StepReport) {
///         self.0.extend(&report.lost);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before any processing of step `step`.
    fn on_step_start(&mut self, _step: Tick) {}

    /// Called after the step completed and passed its invariant checks.
    fn on_step_end(&mut self, _report: &StepReport) {}

    /// Called every `config.output_interval_steps` steps with the full state.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once when `run` stops.
    fn on_sim_end(&mut self, _final_step: Tick, _metrics: &Metrics) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
