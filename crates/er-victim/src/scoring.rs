//! Survival decay, urgency, and rescue-probability formulas.

use er_core::{PlannerParams, RescueParams, VictimParams};

use crate::{Severity, Victim};

/// Survival lost in one step by a victim of `severity` on a cell of hazard
/// `intensity`:
///
/// `base_decay + hazard_penalty·intensity + severity_penalty·[severity ≥ critical]`
pub fn survival_loss(severity: Severity, intensity: f64, params: &VictimParams) -> f64 {
    let critical = severity.get() >= params.critical_severity;
    params.base_decay + params.hazard_penalty * intensity + if critical { params.severity_penalty } else { 0.0 }
}

/// Survival `victim` would have after `steps` more steps on a cell that
/// stays at `intensity`.  Clamped at `0`.
pub fn projected_survival(victim: &Victim, intensity: f64, params: &VictimParams, steps: u32) -> f64 {
    (victim.survival - steps as f64 * survival_loss(victim.severity, intensity, params)).max(0.0)
}

/// Bonus subtracted from a victim's target score.  It grows as survival
/// falls and as severity rises:
///
/// `urgency_survival_weight·(1 − survival) + urgency_severity_weight·(severity − 1)`
pub fn urgency_bonus(victim: &Victim, params: &PlannerParams) -> f64 {
    params.urgency_survival_weight * (1.0 - victim.survival)
        + params.urgency_severity_weight * (victim.severity.get() as f64 - 1.0)
}

/// Success probability of one rescue attempt:
/// `min(max_probability, base_rate × efficiency × bonus)`, where `bonus` is
/// `preferred_resource_bonus` if the agent holds equipment preferred for the
/// disaster and `1.0` otherwise.
pub fn rescue_probability(params: &RescueParams, efficiency: f64, preferred_resource: bool) -> f64 {
    let bonus = if preferred_resource { params.preferred_resource_bonus } else { 1.0 };
    (params.base_rate * efficiency.clamp(0.0, 1.0) * bonus).clamp(0.0, params.max_probability)
}
