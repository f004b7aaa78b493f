//! Planner trait and the default A* implementation.
//!
//! # Pluggability
//!
//! `er-sim` plans through the [`Planner`] trait, so a different search
//! (Dijkstra, jump-point, learned heuristics) can be dropped in without
//! touching the step loop.
//!
//! # Ordering
//!
//! Open-set entries are `(f, risk, seq, cell)` in integer milli-units:
//!
//! 1. lowest `f = g + h`;
//! 2. then lowest accumulated risk;
//! 3. then earliest insertion (`seq`).
//!
//! The same field and endpoints therefore always yield the same path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use er_core::{Cell, Grid, PlannerParams};
use er_field::HazardField;

use crate::{Path, PlanOutcome, PlannerResult};

/// Fixed-point scale: one unit of cost or risk is 1000 milli-units.
const MILLI: f64 = 1000.0;

/// Sentinel for "no predecessor" in the flat `prev` buffer.
const NO_PREV: u32 = u32::MAX;

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Planner: Send + Sync {
    /// Minimum-cost route from `from` to `to` over the current field.
    ///
    /// Both cells must be on the grid; `from == to` yields a zero-move path.
    fn route(&self, field: &HazardField, from: Cell, to: Cell) -> PlannerResult<PlanOutcome>;

    /// Entry cost of `cell`, in cost units.
    fn step_cost(&self, field: &HazardField, cell: Cell) -> f64;

    /// `true` if the planner may enter `cell`.
    fn passable(&self, field: &HazardField, cell: Cell) -> bool;

    /// Whether 8-directional moves are allowed.
    fn diagonal(&self) -> bool;
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// Best-first search with a Manhattan (or Chebyshev, with diagonals)
/// heuristic.  The heuristic is admissible because every move costs at
/// least one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct AStarPlanner {
    pub risk_weight:       f64,
    pub diagonal:          bool,
    pub blocked_intensity: f64,
}

impl Default for AStarPlanner {
    fn default() -> Self {
        Self::from_params(&PlannerParams::default())
    }
}

impl AStarPlanner {
    pub fn from_params(params: &PlannerParams) -> Self {
        Self {
            risk_weight:       params.risk_weight,
            diagonal:          params.diagonal,
            blocked_intensity: params.blocked_intensity,
        }
    }

    #[inline]
    fn cost_milli(&self, intensity: f64) -> u64 {
        (MILLI + (self.risk_weight * intensity * MILLI).round()) as u64
    }

    #[inline]
    fn heuristic_milli(&self, from: Cell, to: Cell) -> u64 {
        from.step_distance(to, self.diagonal) as u64 * MILLI as u64
    }
}

impl Planner for AStarPlanner {
    fn route(&self, field: &HazardField, from: Cell, to: Cell) -> PlannerResult<PlanOutcome> {
        let grid = field.grid();
        grid.check(from)?;
        grid.check(to)?;

        if from == to {
            return Ok(PlanOutcome::Found(Path::stay(from)));
        }
        if !self.passable(field, to) {
            return Ok(PlanOutcome::NoPath);
        }

        let n = grid.cell_count();
        // g[v] = best known cost (milli) to reach v.
        let mut g    = vec![u64::MAX; n];
        // risk[v] = accumulated risk (milli) along the best path to v.
        let mut risk = vec![u64::MAX; n];
        let mut prev = vec![NO_PREV; n];
        let mut seq: u64 = 0;

        let start = grid.index(from);
        let goal = grid.index(to);
        g[start] = 0;
        risk[start] = 0;

        let mut heap: BinaryHeap<Reverse<(u64, u64, u64, u32)>> = BinaryHeap::new();
        heap.push(Reverse((self.heuristic_milli(from, to), 0, seq, start as u32)));

        while let Some(Reverse((f, r, _, idx))) = heap.pop() {
            let idx = idx as usize;
            if idx == goal {
                return Ok(PlanOutcome::Found(reconstruct(grid, field, &prev, goal, g[goal])));
            }

            let cell = grid.cell_at(idx);
            // Skip stale heap entries.
            if f - self.heuristic_milli(cell, to) > g[idx] || r > risk[idx] {
                continue;
            }

            for next in grid.neighbors(cell, self.diagonal) {
                if !self.passable(field, next) {
                    continue;
                }
                let intensity = field.get(next);
                let ni = grid.index(next);
                let ng = g[idx].saturating_add(self.cost_milli(intensity));
                let nr = risk[idx].saturating_add((intensity * MILLI).round() as u64);

                if ng < g[ni] || (ng == g[ni] && nr < risk[ni]) {
                    g[ni] = ng;
                    risk[ni] = nr;
                    prev[ni] = idx as u32;
                    seq += 1;
                    heap.push(Reverse((ng + self.heuristic_milli(next, to), nr, seq, ni as u32)));
                }
            }
        }

        Ok(PlanOutcome::NoPath)
    }

    fn step_cost(&self, field: &HazardField, cell: Cell) -> f64 {
        self.cost_milli(field.get(cell)) as f64 / MILLI
    }

    fn passable(&self, field: &HazardField, cell: Cell) -> bool {
        field.get(cell) < self.blocked_intensity
    }

    fn diagonal(&self) -> bool {
        self.diagonal
    }
}

fn reconstruct(grid: Grid, field: &HazardField, prev: &[u32], goal: usize, total_milli: u64) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal as u32;
    while cur != NO_PREV {
        cells.push(grid.cell_at(cur as usize));
        cur = prev[cur as usize];
    }
    cells.reverse();
    let total_risk = cells.iter().skip(1).map(|c| field.get(*c)).sum();
    Path { cells, total_cost: total_milli as f64 / MILLI, total_risk }
}
