//! `er-sim` — step orchestrator for the emergency-response engine.
//!
//! # Step loop
//!
//! ```text
//! step():
//!   ① Hazards  — HazardField::advance (spread, jitter, decay, seeding)
//!   ② Victims  — VictimRegistry::decay; survival 0 → lost
//!   ③ Agent    — auto-pilot only:
//!                  at base with victims on board → drop off
//!                  exhausted                      → rest
//!                  victim here and able           → attempt rescue
//!                  cache here                     → collect
//!                  full                           → head to base
//!                  no equipment                   → head to nearest cache
//!                  otherwise                      → one move toward select_target
//!                  no path                        → greedy fallback, then escape
//!   ④ Checks   — invariants; a violation aborts with SimError::Invariant
//!   → Snapshot / StepReport
//! ```
//!
//! # Modules
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`sim`]        | `Sim`: step loop, commands, queries                 |
//! | [`builder`]    | `SimBuilder` with optional scenario overrides       |
//! | [`scenario`]   | `Scenario`, `Cache`, random scenario generation     |
//! | [`snapshot`]   | `Snapshot` and its view structs                     |
//! | [`report`]     | `StepReport`, `AgentAction`, command outcomes       |
//! | [`metrics`]    | `Metrics`                                           |
//! | [`observer`]   | `SimObserver`, `NoopObserver`                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use er_core::SimConfig;
//! use er_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default()).build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{}", sim.snapshot().to_json()?);
//! ```

pub mod builder;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod report;
pub mod scenario;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use metrics::Metrics;
pub use observer::{NoopObserver, SimObserver};
pub use report::{
    AgentAction, CollectOutcome, MoveReason, Recommendation, RescueOutcome, StepReport, SurvivalEstimate,
};
pub use scenario::{CACHE_UNITS, Cache, Scenario, generate_scenario};
pub use sim::Sim;
pub use snapshot::{AgentView, HazardEntry, Snapshot, VictimView};
