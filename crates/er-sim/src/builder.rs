//! Fluent builder for constructing a [`Sim`].

use er_core::{Grid, SimConfig, SimRng};
use er_field::{HazardField, Overlay, TerrainMap};
use er_planner::{AStarPlanner, Planner};
use er_victim::VictimRegistry;

use crate::scenario::generate_scenario;
use crate::{Cache, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// The scenario is always generated from `config.seed`; the optional
/// inputs replace parts of it after generation, so the simulation RNG
/// stream is the same with or without overrides.
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                 |
/// |-------------------|-----------------------------------------|
/// | `.planner(p)`     | `AStarPlanner::from_params(&config.planner)` |
/// | `.terrain(t)`     | Generated terrain rings                 |
/// | `.hazards(h)`     | Disaster footprint                      |
/// | `.overlay(o)`     | Disaster footprint's overlay            |
/// | `.victims(v)`     | Random victims                          |
/// | `.caches(c)`      | Disaster cache mix                      |
/// | `.auto(b)`        | `true`                                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .hazards(field)
///     .victims(registry)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: Planner = AStarPlanner> {
    config:  SimConfig,
    planner: P,
    terrain: Option<TerrainMap>,
    hazards: Option<HazardField>,
    overlay: Option<Overlay>,
    victims: Option<VictimRegistry>,
    caches:  Option<Vec<Cache>>,
    auto:    bool,
}

impl SimBuilder<AStarPlanner> {
    /// Builder using the A* planner configured from `config.planner`.
    pub fn new(config: SimConfig) -> Self {
        let planner = AStarPlanner::from_params(&config.planner);
        SimBuilder::with_planner(config, planner)
    }
}

impl<P: Planner> SimBuilder<P> {
    pub fn with_planner(config: SimConfig, planner: P) -> Self {
        Self {
            config,
            planner,
            terrain: None,
            hazards: None,
            overlay: None,
            victims: None,
            caches:  None,
            auto:    true,
        }
    }

    /// Swap in a different routing engine.
    pub fn planner<Q: Planner>(self, planner: Q) -> SimBuilder<Q> {
        SimBuilder {
            config: self.config,
            planner,
            terrain: self.terrain,
            hazards: self.hazards,
            overlay: self.overlay,
            victims: self.victims,
            caches:  self.caches,
            auto:    self.auto,
        }
    }

    pub fn terrain(mut self, terrain: TerrainMap) -> Self {
        self.terrain = Some(terrain);
        self
    }

    pub fn hazards(mut self, hazards: HazardField) -> Self {
        self.hazards = Some(hazards);
        self
    }

    pub fn overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn victims(mut self, victims: VictimRegistry) -> Self {
        self.victims = Some(victims);
        self
    }

    pub fn caches(mut self, caches: Vec<Cache>) -> Self {
        self.caches = Some(caches);
        self
    }

    /// Enable or disable the auto-pilot.
    pub fn auto(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    /// Validate the config and overrides, generate the scenario, and return
    /// a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;
        let grid = Grid::new(self.config.grid_size);

        let mut rng = SimRng::new(self.config.seed);
        let mut scenario = generate_scenario(&self.config, &mut rng)?;

        // ── Apply overrides ───────────────────────────────────────────────
        if let Some(terrain) = self.terrain {
            if terrain.grid() != grid {
                return Err(SimError::ShapeMismatch { what: "terrain", grid });
            }
            scenario.terrain = terrain;
        }
        if let Some(hazards) = self.hazards {
            if hazards.grid() != grid {
                return Err(SimError::ShapeMismatch { what: "hazard field", grid });
            }
            scenario.hazards = hazards;
        }
        if let Some(overlay) = self.overlay {
            if overlay.grid != grid {
                return Err(SimError::ShapeMismatch { what: "overlay", grid });
            }
            scenario.overlay = overlay;
        }
        if let Some(victims) = self.victims {
            if victims.iter().any(|v| !grid.contains(v.position)) {
                return Err(SimError::ShapeMismatch { what: "victim positions", grid });
            }
            scenario.victims = victims;
        }
        if let Some(caches) = self.caches {
            if caches.iter().any(|c| !grid.contains(c.position)) {
                return Err(SimError::ShapeMismatch { what: "cache positions", grid });
            }
            scenario.caches = caches;
        }

        Ok(Sim::from_parts(self.config, self.planner, scenario, rng, self.auto))
    }
}
