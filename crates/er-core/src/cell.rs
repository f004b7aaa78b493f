//! Grid coordinates and flat-array indexing.
//!
//! The world is a fixed `N × N` square.  Per-cell state (terrain, hazard
//! intensity, search scratch buffers) lives in flat `Vec`s indexed by
//! `row * N + col`; there are no node objects and no neighbour pointers.
//! Neighbour lookup is coordinate arithmetic and is O(1).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Cardinal offsets in a fixed order: north, south, west, east.
const CARDINAL: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Cardinal offsets followed by the four diagonals.
const OCTILE: [(i64, i64); 8] = [
    (-1, 0), (1, 0), (0, -1), (0, 1),
    (-1, -1), (-1, 1), (1, -1), (1, 1),
];

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A `(row, col)` grid coordinate.
///
/// `Cell` itself carries no bound; validity is always relative to a [`Grid`].
/// Ordering is row-major, which is also the flat-array order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// `|Δrow| + |Δcol|`.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// `max(|Δrow|, |Δcol|)`.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Step distance under the given movement model: Manhattan for
    /// 4-connected grids, Chebyshev when diagonal moves are allowed.
    #[inline]
    pub fn step_distance(self, other: Cell, diagonal: bool) -> u32 {
        if diagonal { self.chebyshev(other) } else { self.manhattan(other) }
    }

    /// `true` if `other` is exactly one move away.
    #[inline]
    pub fn is_adjacent(self, other: Cell, diagonal: bool) -> bool {
        self.step_distance(other, diagonal) == 1
    }

    /// Euclidean distance, used by the disaster footprints and overlays.
    #[inline]
    pub fn euclidean(self, other: Cell) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Dimensions of the square simulation grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Grid {
    size: u32,
}

impl Grid {
    #[inline]
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Side length `N`.
    #[inline]
    pub fn size(self) -> u32 {
        self.size
    }

    /// `N²`.
    #[inline]
    pub fn cell_count(self) -> usize {
        self.size as usize * self.size as usize
    }

    #[inline]
    pub fn contains(self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Validate a caller-supplied coordinate.
    pub fn check(self, cell: Cell) -> CoreResult<Cell> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(CoreError::InvalidCoordinate { cell, size: self.size })
        }
    }

    /// Flat index of `cell`.
    ///
    /// # Panics
    /// Panics if `cell` is outside the grid.  Internal callers only ever pass
    /// coordinates produced by this grid, so a miss is a programming error.
    #[inline]
    pub fn index(self, cell: Cell) -> usize {
        assert!(self.contains(cell), "cell {cell} outside {0}x{0} grid", self.size);
        cell.row as usize * self.size as usize + cell.col as usize
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn cell_at(self, index: usize) -> Cell {
        let n = self.size as usize;
        Cell::new((index / n) as u32, (index % n) as u32)
    }

    /// All cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let n = self.size;
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(row, col)))
    }

    /// `cell + (dr, dc)` if the result is on the grid.
    #[inline]
    pub fn offset(self, cell: Cell, dr: i64, dc: i64) -> Option<Cell> {
        let row = cell.row as i64 + dr;
        let col = cell.col as i64 + dc;
        let n = self.size as i64;
        if (0..n).contains(&row) && (0..n).contains(&col) {
            Some(Cell::new(row as u32, col as u32))
        } else {
            None
        }
    }

    /// In-bounds neighbours of `cell` in a fixed order (cardinals first).
    pub fn neighbors(self, cell: Cell, diagonal: bool) -> impl Iterator<Item = Cell> {
        let offsets: &'static [(i64, i64)] = if diagonal { &OCTILE } else { &CARDINAL };
        offsets
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(cell, dr, dc))
    }

    /// The grid's centre cell (rounded down).
    #[inline]
    pub fn center(self) -> Cell {
        Cell::new(self.size / 2, self.size / 2)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.size)
    }
}
