//! Random scenario generation.
//!
//! A scenario is drawn from the master RNG in a fixed order, each part on
//! its own child stream:
//!
//! | Stream | Draws                                             |
//! |--------|---------------------------------------------------|
//! | 1      | terrain rings                                     |
//! | 2      | initial hazard footprint and overlay              |
//! | 3      | victim count, positions, severities               |
//! | 4      | resource cache positions                          |
//! | 5      | hazard spread, jitter, and seeding during the run |
//! | 6      | rescue rolls                                      |
//!
//! Streams 5 and 6 are split off by `run_streams` once generation is done,
//! so a rescue attempt never shifts how the hazard field evolves.
//!
//! Victims never start on the base cell and never share a cell.  Caches
//! avoid the base and victim cells.

use serde::{Deserialize, Serialize};
use tracing::debug;

use er_core::{CacheId, Cell, Grid, ResourceKind, SimConfig, SimRng};
use er_field::{HazardField, Overlay, TerrainMap, generate_footprint};
use er_victim::{Severity, VictimRegistry};

use crate::SimResult;

const HAZARD_STREAM: u64 = 5;
const RESCUE_STREAM: u64 = 6;

/// Units of equipment picked up from one cache.
pub const CACHE_UNITS: u32 = 2;

/// A pile of equipment on the map.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    pub id:       CacheId,
    pub position: Cell,
    pub kind:     ResourceKind,
    pub quantity: u32,
}

/// Everything a fresh simulation starts from.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub terrain: TerrainMap,
    pub hazards: HazardField,
    pub overlay: Overlay,
    pub victims: VictimRegistry,
    pub caches:  Vec<Cache>,
}

/// The `(hazard, rescue)` streams a running simulation draws from.
pub(crate) fn run_streams(rng: &mut SimRng) -> (SimRng, SimRng) {
    (rng.child(HAZARD_STREAM), rng.child(RESCUE_STREAM))
}

/// Draw a scenario for `config` from `rng`.
pub fn generate_scenario(config: &SimConfig, rng: &mut SimRng) -> SimResult<Scenario> {
    let grid = Grid::new(config.grid_size);
    let base = config.scenario.base;

    let terrain = TerrainMap::generate(grid, &mut rng.child(1));
    let footprint = generate_footprint(grid, config.disaster, &mut rng.child(2))?;

    // Free cells in row-major order, shuffled once and consumed front to back.
    let mut placement = rng.child(3);
    let mut free: Vec<Cell> = grid.cells().filter(|c| *c != base).collect();
    placement.shuffle(&mut free);
    let mut free = free.into_iter();

    let count = placement.gen_range(config.scenario.victim_count_min..=config.scenario.victim_count_max);
    let mut victims = VictimRegistry::new();
    for position in free.by_ref().take(count as usize) {
        let severity = Severity::new(placement.gen_range(Severity::MIN.get()..=Severity::MAX.get()))?;
        victims.push_default(position, severity)?;
    }

    let mut caches = Vec::new();
    if config.scenario.place_caches {
        let mut cache_rng = rng.child(4);
        let mut spots: Vec<Cell> = free.collect();
        cache_rng.shuffle(&mut spots);
        let kinds = ResourceKind::cache_mix(config.disaster)
            .iter()
            .flat_map(|&(kind, n)| std::iter::repeat_n(kind, n as usize));
        for (i, (kind, position)) in kinds.zip(spots).enumerate() {
            caches.push(Cache { id: CacheId(i as u32), position, kind, quantity: CACHE_UNITS });
        }
    }

    debug!(
        grid = %grid,
        disaster = %config.disaster,
        victims = victims.len(),
        caches = caches.len(),
        hazard_cells = footprint.hazards.occupied(),
        "scenario generated"
    );

    Ok(Scenario {
        terrain,
        hazards: footprint.hazards,
        overlay: footprint.overlay,
        victims,
        caches,
    })
}
