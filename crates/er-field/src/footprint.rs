//! Initial hazard footprints.
//!
//! Each disaster starts from a recognisable pattern rather than a single
//! spark.  Radii are quoted for a 20-cell grid and scaled by `N / 20`.
//!
//! | Disaster   | Pattern                                 | Fill p | Intensity                         |
//! |------------|-----------------------------------------|--------|-----------------------------------|
//! | Earthquake | 2–3 epicentres, radius 4–7              | 0.9    | `max(0.3, 1 − 0.6·d/r)`           |
//! | Fire       | 1–2 zones, radius 5–8                   | 0.8    | `max(0.2, 1 − 0.7·d/r)`           |
//! | Flood      | one edge, depth 3–6                     | 0.9    | `max(0.2, 1 − 0.6·depth/D)`       |
//! | Hurricane  | one storm, radius 6–9                   | 0.7    | eye 0.1, wall 1.0, band tapering  |
//! | Tornado    | one funnel, radius 5–7                  | 0.8    | `max(0.3, 0.9·(1 − d/r)·spiral)`  |
//!
//! The returned [`Overlay`] shares the footprint's geometry so spread keeps
//! the same shape as the disaster evolves.

use er_core::{Cell, DisasterKind, Grid, SimRng};

use crate::{Edge, FieldResult, HazardField, Overlay};

/// Initial hazards plus the matching spread overlay.
#[derive(Clone, Debug)]
pub struct Footprint {
    pub hazards: HazardField,
    pub overlay: Overlay,
}

/// Generate the initial footprint for `disaster`.
pub fn generate_footprint(grid: Grid, disaster: DisasterKind, rng: &mut SimRng) -> FieldResult<Footprint> {
    let mut hazards = HazardField::new(grid);
    let scale = grid.size() as f64 / 20.0;

    let overlay = match disaster {
        DisasterKind::Earthquake => {
            let zones = rng.gen_range(2..=3);
            let mut first = None;
            for _ in 0..zones {
                let center = pick_center(grid, rng, 3);
                let radius = scaled_radius(rng, 4, 7, scale);
                first.get_or_insert((center, radius));
                fill_disc(&mut hazards, rng, center, radius, 0.9, |d| (1.0 - 0.6 * d / radius).max(0.3))?;
            }
            let (center, radius) = first.unwrap_or((grid.center(), 4.0 * scale));
            Overlay::new(disaster, grid, center, radius, Edge::Top)
        }
        DisasterKind::Fire => {
            let zones = rng.gen_range(1..=2);
            let mut first = None;
            for _ in 0..zones {
                let center = pick_center(grid, rng, 4);
                let radius = scaled_radius(rng, 5, 8, scale);
                first.get_or_insert((center, radius));
                fill_disc(&mut hazards, rng, center, radius, 0.8, |d| (1.0 - 0.7 * d / radius).max(0.2))?;
            }
            let (center, radius) = first.unwrap_or((grid.center(), 5.0 * scale));
            Overlay::new(disaster, grid, center, radius, Edge::Top)
        }
        DisasterKind::Flood => {
            let edge = rng.choose(&Edge::ALL).copied().unwrap_or_default();
            let depth = scaled_radius(rng, 3, 6, scale);
            for cell in grid.cells() {
                let d = edge.depth(grid, cell) as f64;
                if d <= depth && rng.gen_bool(0.9) {
                    hazards.set(cell, (1.0 - 0.6 * d / depth).max(0.2))?;
                }
            }
            Overlay::new(disaster, grid, grid.center(), depth, edge)
        }
        DisasterKind::Hurricane => {
            let center = pick_middle_third(grid, rng);
            let radius = scaled_radius(rng, 6, 9, scale);
            fill_disc(&mut hazards, rng, center, radius, 0.7, |d| {
                if d < 0.2 * radius {
                    0.1
                } else if d < 0.4 * radius {
                    1.0
                } else {
                    (0.8 - 0.5 * (d - 0.4 * radius) / (0.6 * radius)).max(0.3)
                }
            })?;
            Overlay::new(disaster, grid, center, radius, Edge::Top)
        }
        DisasterKind::Tornado => {
            let center = pick_middle_third(grid, rng);
            let radius = scaled_radius(rng, 5, 7, scale);
            for cell in grid.cells() {
                let d = cell.euclidean(center);
                if d > radius || !rng.gen_bool(0.8) {
                    continue;
                }
                let theta = (cell.col as f64 - center.col as f64)
                    .atan2(cell.row as f64 - center.row as f64);
                let spiral = (2.0 * theta + 0.4 * d).sin().abs();
                hazards.set(cell, (0.9 * (1.0 - d / radius) * spiral).max(0.3))?;
            }
            Overlay::new(disaster, grid, center, radius, Edge::Top)
        }
    };

    Ok(Footprint { hazards, overlay })
}

fn scaled_radius(rng: &mut SimRng, lo: u32, hi: u32, scale: f64) -> f64 {
    (rng.gen_range(lo..=hi) as f64 * scale).max(1.5)
}

/// Uniform centre at least `margin` cells from every edge, or the grid
/// centre when the grid is too small for the margin.
fn pick_center(grid: Grid, rng: &mut SimRng, margin: u32) -> Cell {
    let n = grid.size();
    if n < 2 * margin + 2 {
        return grid.center();
    }
    let hi = n - margin - 1;
    Cell::new(rng.gen_range(margin..=hi), rng.gen_range(margin..=hi))
}

/// Uniform centre in the middle third of the grid.
fn pick_middle_third(grid: Grid, rng: &mut SimRng) -> Cell {
    let n = grid.size();
    let (lo, hi) = (n / 3, (2 * n / 3).min(n - 1));
    if lo >= hi {
        return grid.center();
    }
    Cell::new(rng.gen_range(lo..=hi), rng.gen_range(lo..=hi))
}

/// Fill a disc with probability `fill`, keeping the higher of the existing
/// and new intensity where discs overlap.
fn fill_disc<F>(
    hazards: &mut HazardField,
    rng: &mut SimRng,
    center: Cell,
    radius: f64,
    fill: f64,
    intensity: F,
) -> FieldResult<()>
where
    F: Fn(f64) -> f64,
{
    let grid = hazards.grid();
    let reach = radius.ceil() as i64;
    for dr in -reach..=reach {
        for dc in -reach..=reach {
            let Some(cell) = grid.offset(center, dr, dc) else { continue };
            let d = cell.euclidean(center);
            if d > radius || !rng.gen_bool(fill) {
                continue;
            }
            let value = intensity(d).clamp(0.0, 1.0);
            if value > hazards.get(cell) {
                hazards.set(cell, value)?;
            }
        }
    }
    Ok(())
}
