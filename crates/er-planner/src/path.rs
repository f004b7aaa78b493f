//! Planner results.

use serde::{Deserialize, Serialize};

use er_core::Cell;

/// An ordered run of adjacent cells from start to goal.
///
/// `cells[0]` is the start.  `total_cost` sums the entry cost of every cell
/// after the start; `total_risk` sums their hazard intensities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub cells:      Vec<Cell>,
    pub total_cost: f64,
    pub total_risk: f64,
}

impl Path {
    /// The zero-move path that stays on `cell`.
    pub fn stay(cell: Cell) -> Self {
        Self { cells: vec![cell], total_cost: 0.0, total_risk: 0.0 }
    }

    /// Number of moves (one less than the number of cells).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// `true` if the path makes no moves.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// The first move, if any.
    pub fn next_step(&self) -> Option<Cell> {
        self.cells.get(1).copied()
    }
}

/// Outcome of a routing query.  `NoPath` is a normal result, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanOutcome {
    Found(Path),
    NoPath,
}

impl PlanOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            PlanOutcome::Found(p) => Some(p),
            PlanOutcome::NoPath   => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            PlanOutcome::Found(p) => Some(p),
            PlanOutcome::NoPath   => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PlanOutcome::Found(_))
    }
}
