//! Victim target selection.

use tracing::trace;

use er_core::{Cell, PlannerParams, VictimId};
use er_field::HazardField;
use er_victim::{VictimRegistry, urgency_bonus};

use crate::{Path, PlanOutcome, Planner, PlannerResult};

/// The victim chosen for pursuit and the route to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub victim: VictimId,
    pub path:   Path,
    /// `cost + target_risk_weight × risk − urgency`; lower is better.
    pub score:  f64,
}

/// Pick the active victim with the lowest score.
///
/// Victims below `min_target_survival` and victims with no path are skipped.
/// Equal scores go to the lower id, since victims are visited in id order
/// and only a strictly better score replaces the incumbent.
pub fn select_target<P: Planner + ?Sized>(
    planner: &P,
    field: &HazardField,
    from: Cell,
    victims: &VictimRegistry,
    params: &PlannerParams,
) -> PlannerResult<Option<Target>> {
    let mut best: Option<Target> = None;

    for victim in victims.active() {
        if victim.survival < params.min_target_survival {
            continue;
        }
        let PlanOutcome::Found(path) = planner.route(field, from, victim.position)? else {
            trace!(victim = %victim.id, "no path to victim");
            continue;
        };
        let score = path.total_cost + params.target_risk_weight * path.total_risk
            - urgency_bonus(victim, params);
        if best.as_ref().is_none_or(|b| score < b.score) {
            best = Some(Target { victim: victim.id, path, score });
        }
    }

    Ok(best)
}
