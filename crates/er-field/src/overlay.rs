//! Disaster-shaped spread bias.
//!
//! The stochastic spread rule is the same for every disaster; only this mask
//! differs.  `Overlay::bias` returns a non-negative multiplier applied to the
//! spread probability into a cell.  It is a pure function of the cell, the
//! step index, and the overlay's geometry, so it never consumes randomness.
//!
//! | Disaster   | Shape                                                     |
//! |------------|-----------------------------------------------------------|
//! | Hurricane  | calm eye (0.25), eye wall (1.5), tapering outward        |
//! | Tornado    | rotating two-arm spiral, decaying with distance           |
//! | Flood      | 1.5 at the flooded edge down to 0.3 at the far edge      |
//! | others     | uniform 1.0                                               |

use serde::{Deserialize, Serialize};

use er_core::{Cell, DisasterKind, Grid};

/// Grid edge a flood enters from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Rows/columns between `cell` and this edge.
    pub fn depth(self, grid: Grid, cell: Cell) -> u32 {
        let last = grid.size().saturating_sub(1);
        match self {
            Edge::Top    => cell.row,
            Edge::Bottom => last.saturating_sub(cell.row),
            Edge::Left   => cell.col,
            Edge::Right  => last.saturating_sub(cell.col),
        }
    }
}

/// Geometry of one disaster's spread mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub kind:   DisasterKind,
    pub grid:   Grid,
    /// Storm centre (hurricane, tornado) or primary epicentre.
    pub center: Cell,
    /// Characteristic radius in cells.
    pub radius: f64,
    /// Flood entry edge.
    pub edge:   Edge,
}

impl Overlay {
    pub fn new(kind: DisasterKind, grid: Grid, center: Cell, radius: f64, edge: Edge) -> Self {
        Self { kind, grid, center, radius: radius.max(1.0), edge }
    }

    /// Centred overlay with the default radius for `grid`.
    pub fn centered(kind: DisasterKind, grid: Grid) -> Self {
        let radius = (grid.size() as f64 / 3.0).max(1.0);
        Self::new(kind, grid, grid.center(), radius, Edge::Top)
    }

    /// Spread-probability multiplier for `cell` at `step`.
    pub fn bias(&self, cell: Cell, step: u64) -> f64 {
        match self.kind {
            DisasterKind::Hurricane => self.hurricane(cell),
            DisasterKind::Tornado   => self.tornado(cell, step),
            DisasterKind::Flood     => self.flood(cell),
            DisasterKind::Earthquake | DisasterKind::Fire => 1.0,
        }
    }

    fn hurricane(&self, cell: Cell) -> f64 {
        let r = self.radius;
        let d = cell.euclidean(self.center);
        if d < 0.2 * r {
            0.25
        } else if d < 0.4 * r {
            1.5
        } else {
            (1.2 - 0.9 * (d - 0.4 * r) / r).max(0.3)
        }
    }

    fn tornado(&self, cell: Cell, step: u64) -> f64 {
        let d = cell.euclidean(self.center);
        let theta = (cell.col as f64 - self.center.col as f64)
            .atan2(cell.row as f64 - self.center.row as f64);
        let decay = (1.0 - d / (2.0 * self.radius)).max(0.2);
        let arm = (2.0 * theta + 0.4 * d - 0.3 * step as f64).sin().abs();
        0.3 + 1.2 * arm * decay
    }

    fn flood(&self, cell: Cell) -> f64 {
        let span = self.grid.size().saturating_sub(1).max(1) as f64;
        let depth = self.edge.depth(self.grid, cell) as f64;
        1.5 - 1.2 * depth / span
    }
}
