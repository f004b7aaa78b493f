//! Static terrain map.
//!
//! Generated once per scenario and never mutated afterwards.  Land cover is
//! drawn per cell from three concentric rings around the grid centre:
//!
//! | Ring                   | Kinds (weight)                           |
//! |------------------------|------------------------------------------|
//! | `d < 0.3 N` (core)     | Urban .6, Road .3, Bare .1               |
//! | `d < 0.6 N` (suburbs)  | Road .4, Urban .4, Vegetation .2         |
//! | otherwise (outskirts)  | Vegetation .6, Road .3, Water .1         |

use er_core::{Cell, DisasterKind, Grid, SimRng, TerrainKind};

use crate::{FieldError, FieldResult};

const CORE_RING: &[(TerrainKind, f64)] = &[
    (TerrainKind::Urban, 0.6),
    (TerrainKind::Road, 0.3),
    (TerrainKind::Bare, 0.1),
];

const SUBURB_RING: &[(TerrainKind, f64)] = &[
    (TerrainKind::Road, 0.4),
    (TerrainKind::Urban, 0.4),
    (TerrainKind::Vegetation, 0.2),
];

const OUTSKIRT_RING: &[(TerrainKind, f64)] = &[
    (TerrainKind::Vegetation, 0.6),
    (TerrainKind::Road, 0.3),
    (TerrainKind::Water, 0.1),
];

/// Per-cell land cover for an `N × N` grid.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMap {
    grid: Grid,
    cells: Vec<TerrainKind>,
}

impl TerrainMap {
    /// Every cell set to `kind`.
    pub fn uniform(grid: Grid, kind: TerrainKind) -> Self {
        Self { grid, cells: vec![kind; grid.cell_count()] }
    }

    /// Build from an explicit row-major cell list.
    pub fn from_cells(grid: Grid, cells: Vec<TerrainKind>) -> FieldResult<Self> {
        if cells.len() != grid.cell_count() {
            return Err(FieldError::ShapeMismatch { expected: grid.cell_count(), got: cells.len() });
        }
        Ok(Self { grid, cells })
    }

    /// Draw a ring-structured map.
    pub fn generate(grid: Grid, rng: &mut SimRng) -> Self {
        let n = grid.size() as f64;
        let half = n / 2.0;
        let mut cells = Vec::with_capacity(grid.cell_count());

        for cell in grid.cells() {
            let dr = cell.row as f64 - half;
            let dc = cell.col as f64 - half;
            let d = (dr * dr + dc * dc).sqrt();
            let ring = if d < 0.3 * n {
                CORE_RING
            } else if d < 0.6 * n {
                SUBURB_RING
            } else {
                OUTSKIRT_RING
            };
            let weights: Vec<f64> = ring.iter().map(|(_, w)| *w).collect();
            let kind = rng
                .weighted_index(&weights)
                .map(|i| ring[i].0)
                .unwrap_or_default();
            cells.push(kind);
        }

        Self { grid, cells }
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> TerrainKind {
        self.cells[self.grid.index(cell)]
    }

    #[inline]
    pub fn susceptibility(&self, cell: Cell, kind: DisasterKind) -> f64 {
        self.get(cell).susceptibility(kind)
    }

    #[inline]
    pub fn difficulty(&self, cell: Cell) -> f64 {
        self.get(cell).difficulty()
    }

    /// Row-major slice of all cells.
    pub fn as_slice(&self) -> &[TerrainKind] {
        &self.cells
    }

    /// One string per row using [`TerrainKind::as_char`] codes.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.grid.size() as usize)
            .map(|row| row.iter().map(|k| k.as_char()).collect())
            .collect()
    }
}
