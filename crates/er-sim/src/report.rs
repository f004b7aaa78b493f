//! Per-step event records and the outcomes of agent commands.
//!
//! All of these are plain values.  A failed rescue, a missing cache, or a
//! move that fell back to greedy routing are normal outcomes the
//! presentation layer can turn into notifications.

use serde::{Deserialize, Serialize};

use er_core::{CacheId, Cell, ResourceKind, Tick, VictimId};
use er_field::SpreadReport;
use er_planner::{EscapeTier, Path};

use crate::Metrics;

/// Why the auto-pilot moved.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveReason {
    /// Along the planned path to the selected victim.
    Target,
    /// Toward the cheapest reachable resource cache.
    Cache,
    /// Toward the base to deliver or to stand down.
    Base,
    /// Greedy step after the planner found no path.
    Greedy,
    /// Emergency escape toward the safest reachable cell.
    Escape(EscapeTier),
    /// Caller-issued move.
    Manual,
}

/// Result of [`Sim::attempt_rescue`][crate::Sim::attempt_rescue].
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RescueOutcome {
    Rescued { victim: VictimId, resource: ResourceKind, probability: f64 },
    Failed { victim: VictimId, probability: f64 },
    /// No active victim on the agent's cell.
    NoVictim,
    Exhausted,
    CapacityFull,
    NoResources,
}

impl RescueOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RescueOutcome::Rescued { .. })
    }
}

/// Result of [`Sim::collect_resource`][crate::Sim::collect_resource].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum CollectOutcome {
    Collected { cache: CacheId, kind: ResourceKind, quantity: u32 },
    NoCache,
}

/// What the agent did during one step.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum AgentAction {
    /// Auto-pilot is off; the caller drives the agent.
    Manual,
    Moved { from: Cell, to: Cell, energy: f64, reason: MoveReason },
    Rescue { outcome: RescueOutcome },
    Collect { outcome: CollectOutcome },
    DroppedOff { delivered: u32 },
    Rested { gained: f64 },
    /// Nothing useful to do this step.
    Waiting,
}

impl AgentAction {
    /// Short tag used in tabular output.
    pub fn label(&self) -> &'static str {
        match self {
            AgentAction::Manual => "manual",
            AgentAction::Moved { .. } => "moved",
            AgentAction::Rescue { outcome } if outcome.is_success() => "rescued",
            AgentAction::Rescue { .. } => "rescue",
            AgentAction::Collect { .. } => "collect",
            AgentAction::DroppedOff { .. } => "dropped_off",
            AgentAction::Rested { .. } => "rested",
            AgentAction::Waiting => "waiting",
        }
    }
}

/// Everything that happened during one call to `step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Index of the step just executed (0 for the first).
    pub step:    Tick,
    pub spread:  SpreadReport,
    /// Victims whose survival reached zero this step.
    pub lost:    Vec<VictimId>,
    pub action:  AgentAction,
    /// Counters after the step.
    pub metrics: Metrics,
    /// `true` once every victim is rescued or lost, or the step limit is hit.
    pub done:    bool,
}

/// A suggested route for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub victim: VictimId,
    pub path:   Path,
    /// `true` if the route came from the greedy fallback and may stop short.
    pub greedy: bool,
    /// The victim's survival projected to the step the agent would arrive,
    /// holding the hazard on its cell fixed.
    pub expected_survival: f64,
}

/// One row of [`Sim::survival_estimates`][crate::Sim::survival_estimates].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurvivalEstimate {
    pub victim:            VictimId,
    /// Survival now.
    pub survival:          f64,
    /// Step distance from the agent.
    pub arrival_steps:     u32,
    pub expected_survival: f64,
}
