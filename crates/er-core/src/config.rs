//! Scenario configuration.
//!
//! Every empirically tuned constant of the hazard, planner, victim, and agent
//! models is a field here with its tuned value as the default.  A config file
//! only needs to name the fields it overrides:
//!
//! ```json
//! { "seed": 7, "grid_size": 30, "disaster": "flood",
//!   "planner": { "risk_weight": 2.0 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Cell, CoreError, CoreResult, DisasterKind, ResourceKind};

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level scenario configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Side length `N` of the square grid.
    pub grid_size: u32,

    pub disaster: DisasterKind,

    /// Steps executed by `Sim::run`.  `0` means run until every victim is
    /// rescued or lost.
    pub total_steps: u64,

    /// Emit a snapshot to observers every N steps.  `0` disables snapshots.
    pub output_interval_steps: u64,

    pub spread:   SpreadParams,
    pub planner:  PlannerParams,
    pub victims:  VictimParams,
    pub rescue:   RescueParams,
    pub agent:    AgentParams,
    pub scenario: ScenarioParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                  42,
            grid_size:             20,
            disaster:              DisasterKind::Earthquake,
            total_steps:           100,
            output_interval_steps: 1,
            spread:                SpreadParams::default(),
            planner:               PlannerParams::default(),
            victims:               VictimParams::default(),
            rescue:                RescueParams::default(),
            agent:                 AgentParams::default(),
            scenario:              ScenarioParams::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (partial) JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break model invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid_size < 2 {
            return Err(config_err(format!("grid_size must be at least 2, got {}", self.grid_size)));
        }
        if self.grid_size > u16::MAX as u32 {
            return Err(config_err(format!("grid_size {} is too large", self.grid_size)));
        }
        self.spread.validate()?;
        self.planner.validate()?;
        self.victims.validate()?;
        self.rescue.validate()?;
        self.agent.validate()?;
        self.scenario.validate(self.grid_size)?;
        if self.total_steps == 0 && self.victims.base_decay <= 0.0 {
            return Err(config_err(
                "total_steps = 0 needs victims.base_decay > 0 so the run terminates".into(),
            ));
        }
        Ok(())
    }
}

// ── SpreadParams ──────────────────────────────────────────────────────────────

/// Hazard propagation constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadParams {
    /// Multiplier on `DisasterKind::base_spread_prob`.
    pub base_spread_scale: f64,
    /// `slowdown(c) = max(slowdown_floor, 1 - slowdown_slope * c)`.
    pub slowdown_floor: f64,
    pub slowdown_slope: f64,
    /// A successful spread writes `I * U[transfer_min, transfer_max]`.
    pub transfer_min: f64,
    pub transfer_max: f64,
    /// Random-walk step magnitude for already-hazardous cells.
    pub jitter_min: f64,
    pub jitter_max: f64,
    /// Intensities below this decay to zero.
    pub decay_floor: f64,
    /// Upper bound on the per-step seeding probability.
    pub seed_chance: f64,
    /// No seeding once coverage reaches this ratio.
    pub seed_coverage_cap: f64,
    pub seed_intensity_min: f64,
    pub seed_intensity_max: f64,
    /// Candidate cells tried per seeding event.
    pub seed_attempts: u32,
    /// Spread to the 8-neighbourhood instead of 4.
    pub diagonal: bool,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            base_spread_scale:  1.0,
            slowdown_floor:     0.2,
            slowdown_slope:     0.8,
            transfer_min:       0.4,
            transfer_max:       0.7,
            jitter_min:         0.02,
            jitter_max:         0.05,
            decay_floor:        0.05,
            seed_chance:        0.03,
            seed_coverage_cap:  0.7,
            seed_intensity_min: 0.1,
            seed_intensity_max: 0.3,
            seed_attempts:      50,
            diagonal:           false,
        }
    }
}

impl SpreadParams {
    fn validate(&self) -> CoreResult<()> {
        non_negative("spread.base_spread_scale", self.base_spread_scale)?;
        unit("spread.slowdown_floor", self.slowdown_floor)?;
        non_negative("spread.slowdown_slope", self.slowdown_slope)?;
        unit_range("spread.transfer", self.transfer_min, self.transfer_max)?;
        unit_range("spread.jitter", self.jitter_min, self.jitter_max)?;
        unit("spread.decay_floor", self.decay_floor)?;
        unit("spread.seed_chance", self.seed_chance)?;
        unit("spread.seed_coverage_cap", self.seed_coverage_cap)?;
        unit_range("spread.seed_intensity", self.seed_intensity_min, self.seed_intensity_max)?;
        Ok(())
    }
}

// ── PlannerParams ─────────────────────────────────────────────────────────────

/// Path planning and target selection constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    /// `cost(cell) = 1 + risk_weight * intensity(cell)`.
    pub risk_weight: f64,
    /// Allow 8-directional movement (Chebyshev heuristic).
    pub diagonal: bool,
    /// Cells at or above this intensity cannot be entered.
    pub blocked_intensity: f64,
    /// Highest intensity the greedy fallback will step into.
    pub fallback_risk_tolerance: f64,
    /// Search radius (in moves) of the emergency-escape query.
    pub escape_radius: u32,
    /// Second-tier escape threshold: cells strictly below this are tolerable.
    pub escape_tolerable: f64,
    /// Weight of path risk in the victim target score.
    pub target_risk_weight: f64,
    /// Urgency bonus per unit of lost survival probability.
    pub urgency_survival_weight: f64,
    /// Urgency bonus per severity level above 1.
    pub urgency_severity_weight: f64,
    /// Victims below this survival probability are not pursued.
    pub min_target_survival: f64,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            risk_weight:             1.5,
            diagonal:                false,
            blocked_intensity:       1.0,
            fallback_risk_tolerance: 0.7,
            escape_radius:           5,
            escape_tolerable:        0.3,
            target_risk_weight:      2.0,
            urgency_survival_weight: 3.0,
            urgency_severity_weight: 0.5,
            min_target_survival:     0.1,
        }
    }
}

impl PlannerParams {
    fn validate(&self) -> CoreResult<()> {
        non_negative("planner.risk_weight", self.risk_weight)?;
        if !(self.blocked_intensity > 0.0 && self.blocked_intensity <= 1.0) {
            return Err(config_err(format!(
                "planner.blocked_intensity must be in (0, 1], got {}",
                self.blocked_intensity
            )));
        }
        unit("planner.fallback_risk_tolerance", self.fallback_risk_tolerance)?;
        unit("planner.escape_tolerable", self.escape_tolerable)?;
        non_negative("planner.target_risk_weight", self.target_risk_weight)?;
        non_negative("planner.urgency_survival_weight", self.urgency_survival_weight)?;
        non_negative("planner.urgency_severity_weight", self.urgency_severity_weight)?;
        unit("planner.min_target_survival", self.min_target_survival)?;
        Ok(())
    }
}

// ── VictimParams ──────────────────────────────────────────────────────────────

/// Per-step survival decay constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictimParams {
    pub base_decay: f64,
    /// Multiplied by the hazard intensity at the victim's cell.
    pub hazard_penalty: f64,
    /// Extra decay for victims at or above `critical_severity`.
    pub severity_penalty: f64,
    pub critical_severity: u8,
}

impl Default for VictimParams {
    fn default() -> Self {
        Self {
            base_decay:        0.01,
            hazard_penalty:    0.05,
            severity_penalty:  0.02,
            critical_severity: 4,
        }
    }
}

impl VictimParams {
    fn validate(&self) -> CoreResult<()> {
        unit("victims.base_decay", self.base_decay)?;
        unit("victims.hazard_penalty", self.hazard_penalty)?;
        unit("victims.severity_penalty", self.severity_penalty)?;
        if !(1..=5).contains(&self.critical_severity) {
            return Err(config_err(format!(
                "victims.critical_severity must be in 1..=5, got {}",
                self.critical_severity
            )));
        }
        Ok(())
    }
}

// ── RescueParams ──────────────────────────────────────────────────────────────

/// Rescue transaction constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RescueParams {
    /// `p = base_rate * efficiency * resource_bonus`.
    pub base_rate: f64,
    /// `resource_bonus` when the agent holds equipment preferred for the disaster.
    pub preferred_resource_bonus: f64,
    /// Cap on the success probability.
    pub max_probability: f64,
}

impl Default for RescueParams {
    fn default() -> Self {
        Self {
            base_rate:                0.7,
            preferred_resource_bonus: 1.25,
            max_probability:          0.95,
        }
    }
}

impl RescueParams {
    fn validate(&self) -> CoreResult<()> {
        unit("rescue.base_rate", self.base_rate)?;
        if self.preferred_resource_bonus < 1.0 {
            return Err(config_err(format!(
                "rescue.preferred_resource_bonus must be >= 1, got {}",
                self.preferred_resource_bonus
            )));
        }
        unit("rescue.max_probability", self.max_probability)?;
        Ok(())
    }
}

// ── AgentParams ───────────────────────────────────────────────────────────────

/// Rescue agent energy, fatigue, and capacity constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    pub max_energy: f64,
    /// Victims the agent can carry before it must drop off at base.
    pub capacity: u32,
    /// Energy per move on difficulty-0 terrain.
    pub move_energy: f64,
    /// Extra energy per move per unit of hazard intensity entered.
    pub risk_energy: f64,
    /// Energy per rescue attempt.
    pub rescue_energy: f64,
    /// Move-energy multiplier while carrying victims.
    pub carry_energy_factor: f64,
    /// Energy regained per step while idle.
    pub idle_recovery: f64,
    /// `efficiency = max(min_efficiency, 1 - fatigue_slope * fatigue)`.
    pub min_efficiency: f64,
    pub fatigue_slope: f64,
    /// Resources the agent holds at reset.
    pub initial_kit: Vec<ResourceKind>,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            max_energy:          100.0,
            capacity:            3,
            move_energy:         2.0,
            risk_energy:         3.0,
            rescue_energy:       5.0,
            carry_energy_factor: 1.5,
            idle_recovery:       1.0,
            min_efficiency:      0.3,
            fatigue_slope:       0.7,
            initial_kit:         vec![ResourceKind::MedicalSupplies; 2],
        }
    }
}

impl AgentParams {
    fn validate(&self) -> CoreResult<()> {
        if !(self.max_energy > 0.0 && self.max_energy.is_finite()) {
            return Err(config_err(format!("agent.max_energy must be positive, got {}", self.max_energy)));
        }
        if self.capacity == 0 {
            return Err(config_err("agent.capacity must be at least 1".to_owned()));
        }
        non_negative("agent.move_energy", self.move_energy)?;
        non_negative("agent.risk_energy", self.risk_energy)?;
        non_negative("agent.rescue_energy", self.rescue_energy)?;
        non_negative("agent.carry_energy_factor", self.carry_energy_factor)?;
        non_negative("agent.idle_recovery", self.idle_recovery)?;
        unit("agent.min_efficiency", self.min_efficiency)?;
        unit("agent.fatigue_slope", self.fatigue_slope)?;
        Ok(())
    }
}

// ── ScenarioParams ────────────────────────────────────────────────────────────

/// Random scenario generation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub victim_count_min: u32,
    pub victim_count_max: u32,
    /// Agent start cell; also the drop-off base.
    pub base: Cell,
    /// Place disaster-specific resource caches on the map.
    pub place_caches: bool,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            victim_count_min: 5,
            victim_count_max: 15,
            base:             Cell::new(0, 0),
            place_caches:     true,
        }
    }
}

impl ScenarioParams {
    fn validate(&self, grid_size: u32) -> CoreResult<()> {
        if self.victim_count_min > self.victim_count_max {
            return Err(config_err(format!(
                "scenario.victim_count_min ({}) exceeds victim_count_max ({})",
                self.victim_count_min, self.victim_count_max
            )));
        }
        if self.base.row >= grid_size || self.base.col >= grid_size {
            return Err(config_err(format!("scenario.base {} is off the grid", self.base)));
        }
        Ok(())
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

fn config_err(msg: String) -> CoreError {
    CoreError::Config(msg)
}

fn unit(name: &str, v: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(config_err(format!("{name} must be in [0, 1], got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> CoreResult<()> {
    if v >= 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(config_err(format!("{name} must be a finite non-negative number, got {v}")))
    }
}

fn unit_range(name: &str, lo: f64, hi: f64) -> CoreResult<()> {
    unit(name, lo)?;
    unit(name, hi)?;
    if lo > hi {
        return Err(config_err(format!("{name} range is inverted: [{lo}, {hi}]")));
    }
    Ok(())
}
