//! Dynamic hazard field and its per-step transition.
//!
//! # Step rule
//!
//! `advance` reads a snapshot of the field taken at the start of the step and
//! writes a new one, so spread within a step never chains through cells that
//! only became hazardous during that same step.
//!
//! 1. **Spread.**  Every cell with `I > 0` tries each neighbour with
//!    probability `base × scale × susceptibility × slowdown(c) × bias`,
//!    where `slowdown(c) = max(floor, 1 − slope·c)` and `c` is the coverage
//!    ratio at the start of the step.  A success writes
//!    `max(existing, I × U[transfer_min, transfer_max])`.
//! 2. **Jitter.**  Cells hazardous at the start of the step move by
//!    `±U[jitter_min, jitter_max]`, clamped to `[0, 1]`.
//! 3. **Decay.**  Anything below `decay_floor` becomes `0`.
//! 4. **Seeding.**  While `c < seed_coverage_cap`, with probability
//!    `min(seed_chance, seed_chance × (1 − c))` one clear cell is ignited at
//!    low intensity.  Candidates are accepted with probability equal to their
//!    susceptibility, so new seeds favour terrain matching the disaster.

use serde::{Deserialize, Serialize};
use tracing::trace;

use er_core::{Cell, DisasterKind, Grid, SimRng, SpreadParams};

use crate::{FieldError, FieldResult, Overlay, TerrainMap};

/// What changed during one `advance` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadReport {
    /// Successful neighbour spread rolls.
    pub spread_events: u32,
    /// Cells that went from clear to hazardous through spread (seeding excluded).
    pub newly_hazardous: u32,
    /// Cells that decayed to clear.
    pub decayed: u32,
    /// Cell ignited by the seeding rule, if any.
    pub seeded: Option<Cell>,
    /// Coverage ratio at the start of the step.
    pub coverage_before: f64,
}

/// Per-cell hazard intensity in `[0, 1]`; `0` means clear.
#[derive(Clone, Debug, PartialEq)]
pub struct HazardField {
    grid: Grid,
    intensity: Vec<f64>,
}

impl HazardField {
    /// An all-clear field.
    pub fn new(grid: Grid) -> Self {
        Self { grid, intensity: vec![0.0; grid.cell_count()] }
    }

    /// Build from `(cell, intensity)` entries; later entries overwrite earlier ones.
    pub fn from_entries<I>(grid: Grid, entries: I) -> FieldResult<Self>
    where
        I: IntoIterator<Item = (Cell, f64)>,
    {
        let mut field = Self::new(grid);
        for (cell, value) in entries {
            field.set(cell, value)?;
        }
        Ok(field)
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Intensity at an in-bounds cell.
    #[inline]
    pub fn get(&self, cell: Cell) -> f64 {
        self.intensity[self.grid.index(cell)]
    }

    /// Intensity at a caller-supplied cell.
    pub fn try_get(&self, cell: Cell) -> FieldResult<f64> {
        let cell = self.grid.check(cell)?;
        Ok(self.get(cell))
    }

    /// Set the intensity of one cell.
    pub fn set(&mut self, cell: Cell, value: f64) -> FieldResult<()> {
        let cell = self.grid.check(cell)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(FieldError::IntensityOutOfRange { cell, value });
        }
        let idx = self.grid.index(cell);
        self.intensity[idx] = value;
        Ok(())
    }

    /// Non-zero cells in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.intensity
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, v)| (self.grid.cell_at(i), *v))
    }

    /// Number of hazardous cells.
    pub fn occupied(&self) -> usize {
        self.intensity.iter().filter(|v| **v > 0.0).count()
    }

    /// `occupied / N²`.
    pub fn coverage_ratio(&self) -> f64 {
        self.occupied() as f64 / self.grid.cell_count() as f64
    }

    /// Sum of all intensities.
    pub fn total_intensity(&self) -> f64 {
        self.intensity.iter().sum()
    }

    /// Lowest intensity anywhere on the grid.
    pub fn min_intensity(&self) -> f64 {
        self.intensity.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.intensity
    }

    /// Clear every cell (scenario reset).
    pub fn clear(&mut self) {
        self.intensity.fill(0.0);
    }

    /// Verify every intensity is a finite value in `[0, 1]`.
    pub fn check_invariants(&self) -> FieldResult<()> {
        for (i, &value) in self.intensity.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(FieldError::IntensityOutOfRange { cell: self.grid.cell_at(i), value });
            }
        }
        Ok(())
    }

    /// Advance the field by one step.  See the module docs for the rule.
    pub fn advance(
        &mut self,
        terrain: &TerrainMap,
        disaster: DisasterKind,
        step: u64,
        params: &SpreadParams,
        overlay: &Overlay,
        rng: &mut SimRng,
    ) -> FieldResult<SpreadReport> {
        if terrain.grid() != self.grid {
            return Err(FieldError::ShapeMismatch {
                expected: self.grid.cell_count(),
                got: terrain.grid().cell_count(),
            });
        }

        let grid = self.grid;
        let prev = self.intensity.clone();
        let coverage = prev.iter().filter(|v| **v > 0.0).count() as f64 / grid.cell_count() as f64;
        let slowdown = (1.0 - params.slowdown_slope * coverage).max(params.slowdown_floor);
        let base = disaster.base_spread_prob() * params.base_spread_scale * slowdown;

        let mut report = SpreadReport { coverage_before: coverage, ..SpreadReport::default() };

        // ── Spread ────────────────────────────────────────────────────────
        for (idx, &source) in prev.iter().enumerate() {
            if source <= 0.0 {
                continue;
            }
            let from = grid.cell_at(idx);
            for to in grid.neighbors(from, params.diagonal) {
                let p = (base * terrain.susceptibility(to, disaster) * overlay.bias(to, step))
                    .clamp(0.0, 1.0);
                if !rng.gen_bool(p) {
                    continue;
                }
                let transfer = rng.uniform(params.transfer_min, params.transfer_max);
                let to_idx = grid.index(to);
                let candidate = (source * transfer).min(1.0);
                if candidate > self.intensity[to_idx] {
                    self.intensity[to_idx] = candidate;
                }
                report.spread_events += 1;
            }
        }

        // ── Jitter and decay ──────────────────────────────────────────────
        for (idx, &before) in prev.iter().enumerate() {
            if before > 0.0 {
                let delta = rng.sign() * rng.uniform(params.jitter_min, params.jitter_max);
                self.intensity[idx] = (self.intensity[idx] + delta).clamp(0.0, 1.0);
            }
        }
        for v in self.intensity.iter_mut() {
            if *v < params.decay_floor {
                *v = 0.0;
            }
        }
        report.decayed = prev
            .iter()
            .zip(&self.intensity)
            .filter(|(before, after)| **before > 0.0 && **after == 0.0)
            .count() as u32;
        report.newly_hazardous = prev
            .iter()
            .zip(&self.intensity)
            .filter(|(before, after)| **before == 0.0 && **after > 0.0)
            .count() as u32;

        // ── Seeding ───────────────────────────────────────────────────────
        if coverage < params.seed_coverage_cap {
            let chance = params.seed_chance.min(params.seed_chance * (1.0 - coverage));
            if rng.gen_bool(chance) {
                report.seeded = self.seed_one(terrain, disaster, params, rng);
            }
        }

        self.check_invariants()?;
        Ok(report)
    }

    fn seed_one(
        &mut self,
        terrain: &TerrainMap,
        disaster: DisasterKind,
        params: &SpreadParams,
        rng: &mut SimRng,
    ) -> Option<Cell> {
        let n = self.grid.size();
        for _ in 0..params.seed_attempts {
            let cell = Cell::new(rng.gen_range(0..n), rng.gen_range(0..n));
            let idx = self.grid.index(cell);
            if self.intensity[idx] > 0.0 {
                continue;
            }
            if !rng.gen_bool(terrain.susceptibility(cell, disaster)) {
                continue;
            }
            let value = rng.uniform(params.seed_intensity_min, params.seed_intensity_max);
            self.intensity[idx] = value.max(params.decay_floor);
            trace!(%cell, intensity = value, "hazard seeded");
            return Some(cell);
        }
        None
    }
}
