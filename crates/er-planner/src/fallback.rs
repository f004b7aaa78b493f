//! What to do when A* finds nothing.
//!
//! * [`greedy_fallback`] walks straight at the goal through tolerable cells
//!   and stops as soon as no move gets closer.
//! * [`emergency_escape`] ignores the goal and looks for the safest cell the
//!   agent can reach within a small radius.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use er_core::{Cell, PlannerParams};
use er_field::HazardField;

use crate::{Path, Planner, PlannerResult};

// ── Greedy fallback ───────────────────────────────────────────────────────────

/// Step toward `goal` through neighbours that strictly reduce the step
/// distance and whose intensity is at most `fallback_risk_tolerance`,
/// choosing the cheapest at each step (first in neighbour order on ties).
///
/// Returns `None` if not even one such move exists.  The returned path may
/// stop short of the goal.
pub fn greedy_fallback<P: Planner + ?Sized>(
    planner: &P,
    field: &HazardField,
    from: Cell,
    goal: Cell,
    params: &PlannerParams,
) -> PlannerResult<Option<Path>> {
    let grid = field.grid();
    grid.check(from)?;
    grid.check(goal)?;

    let diagonal = planner.diagonal();
    let mut path = Path::stay(from);
    let mut current = from;

    while current != goal {
        let here = current.step_distance(goal, diagonal);
        let mut best: Option<(Cell, f64)> = None;
        for next in grid.neighbors(current, diagonal) {
            let intensity = field.get(next);
            if next.step_distance(goal, diagonal) >= here
                || intensity > params.fallback_risk_tolerance
                || !planner.passable(field, next)
            {
                continue;
            }
            let cost = planner.step_cost(field, next);
            if best.is_none_or(|(_, c)| cost < c) {
                best = Some((next, cost));
            }
        }
        let Some((next, cost)) = best else { break };
        path.cells.push(next);
        path.total_cost += cost;
        path.total_risk += field.get(next);
        current = next;
    }

    Ok(if path.is_empty() { None } else { Some(path) })
}

// ── Emergency escape ──────────────────────────────────────────────────────────

/// Which preference tier produced an escape cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeTier {
    /// A reachable cell with zero intensity.
    Clear,
    /// The least hazardous reachable cell below `escape_tolerable`.
    Tolerable,
    /// Nothing tolerable in reach: the least hazardous neighbour.
    Neighbor,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct EscapeOutcome {
    pub cell:      Cell,
    pub intensity: f64,
    pub tier:      EscapeTier,
    /// Moves from the start to `cell` (`0` if the agent should stay put).
    pub distance:  u32,
}

/// Find the safest cell reachable from `from` within `escape_radius` moves.
///
/// Reachability is a breadth-first flood over passable cells; the start cell
/// itself is a candidate at distance 0.  Preference order:
///
/// 1. the nearest cell with intensity `0`;
/// 2. the least hazardous cell with intensity `< escape_tolerable`;
/// 3. the least hazardous in-bounds neighbour of `from`, passable or not.
///
/// Remaining ties go to the nearer cell, then to the lower row-major index.
pub fn emergency_escape<P: Planner + ?Sized>(
    planner: &P,
    field: &HazardField,
    from: Cell,
    params: &PlannerParams,
) -> PlannerResult<EscapeOutcome> {
    let grid = field.grid();
    grid.check(from)?;
    let diagonal = planner.diagonal();

    let mut depth = vec![u32::MAX; grid.cell_count()];
    let mut queue = VecDeque::new();
    depth[grid.index(from)] = 0;
    queue.push_back(from);

    // (intensity, depth, index); lexicographic minimum wins.
    let mut clear: Option<(u32, usize)> = None;
    let mut tolerable: Option<(f64, u32, usize)> = None;

    while let Some(cell) = queue.pop_front() {
        let idx = grid.index(cell);
        let d = depth[idx];
        let intensity = field.get(cell);

        if intensity == 0.0 {
            if clear.is_none_or(|best| (d, idx) < best) {
                clear = Some((d, idx));
            }
        } else if intensity < params.escape_tolerable {
            let better = match tolerable {
                None => true,
                Some((bi, bd, bx)) => {
                    intensity < bi || (intensity == bi && (d, idx) < (bd, bx))
                }
            };
            if better {
                tolerable = Some((intensity, d, idx));
            }
        }

        if d >= params.escape_radius {
            continue;
        }
        for next in grid.neighbors(cell, diagonal) {
            let ni = grid.index(next);
            if depth[ni] != u32::MAX || !planner.passable(field, next) {
                continue;
            }
            depth[ni] = d + 1;
            queue.push_back(next);
        }
    }

    if let Some((d, idx)) = clear {
        let cell = grid.cell_at(idx);
        return Ok(EscapeOutcome { cell, intensity: 0.0, tier: EscapeTier::Clear, distance: d });
    }
    if let Some((intensity, d, idx)) = tolerable {
        let cell = grid.cell_at(idx);
        return Ok(EscapeOutcome { cell, intensity, tier: EscapeTier::Tolerable, distance: d });
    }

    let mut best: Option<(Cell, f64)> = None;
    for next in grid.neighbors(from, diagonal) {
        let intensity = field.get(next);
        if best.is_none_or(|(_, b)| intensity < b) {
            best = Some((next, intensity));
        }
    }
    let (cell, intensity) = best.unwrap_or((from, field.get(from)));
    let distance = if cell == from { 0 } else { 1 };
    Ok(EscapeOutcome { cell, intensity, tier: EscapeTier::Neighbor, distance })
}
