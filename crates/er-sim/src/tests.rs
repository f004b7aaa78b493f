//! Integration tests for er-sim.

use er_core::{Cell, DisasterKind, Grid, ResourceKind, SimConfig, TerrainKind};
use er_field::{HazardField, TerrainMap};
use er_victim::{Severity, VictimRegistry};

use crate::{Sim, SimBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Config whose hazard field never changes: no spread, no jitter, no seeding.
fn calm_config(size: u32) -> SimConfig {
    let mut config = SimConfig { seed: 5, grid_size: size, total_steps: 100, ..SimConfig::default() };
    config.spread.base_spread_scale = 0.0;
    config.spread.jitter_min = 0.0;
    config.spread.jitter_max = 0.0;
    config.spread.seed_chance = 0.0;
    config
}

fn victims_at(spots: &[(Cell, u8)]) -> VictimRegistry {
    let mut victims = VictimRegistry::new();
    for &(cell, severity) in spots {
        victims.push_default(cell, Severity::new(severity).unwrap()).unwrap();
    }
    victims
}

/// Road-only map with the given hazards and victims and no caches.
fn calm_sim(config: SimConfig, hazards: HazardField, victims: VictimRegistry) -> Sim {
    let grid = Grid::new(config.grid_size);
    SimBuilder::new(config)
        .terrain(TerrainMap::uniform(grid, TerrainKind::Road))
        .hazards(hazards)
        .victims(victims)
        .caches(vec![])
        .build()
        .unwrap()
}

fn clear(size: u32) -> HazardField {
    HazardField::new(Grid::new(size))
}

/// Rescues always succeed and moving over clear ground is free, so energy
/// and efficiency stay at their maximum.
fn sure_rescue(mut config: SimConfig) -> SimConfig {
    config.rescue.base_rate = 1.0;
    config.rescue.max_probability = 1.0;
    config.agent.move_energy = 0.0;
    config
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use std::collections::HashSet;

    use er_core::CoreError;

    use super::*;
    use crate::SimError;

    #[test]
    fn default_scenario_is_well_formed() {
        let config = SimConfig::default();
        let base = config.scenario.base;
        let sim = SimBuilder::new(config).build().unwrap();

        let n = sim.victims.len();
        assert!((5..=15).contains(&n), "victim count {n}");
        let spots: HashSet<Cell> = sim.victims.iter().map(|v| v.position).collect();
        assert_eq!(spots.len(), n, "victims share a cell");
        assert!(!spots.contains(&base));
        for v in sim.victims.iter() {
            assert_eq!(v.survival, v.severity.initial_survival());
        }

        let expected: u32 = ResourceKind::cache_mix(DisasterKind::Earthquake).iter().map(|(_, k)| k).sum();
        assert_eq!(sim.caches.len() as u32, expected);
        let cache_spots: HashSet<Cell> = sim.caches.iter().map(|c| c.position).collect();
        assert_eq!(cache_spots.len(), sim.caches.len());
        assert!(!cache_spots.contains(&base));
        assert!(cache_spots.is_disjoint(&spots));

        assert_eq!(sim.agent.position, base);
        assert_eq!(sim.agent.energy, 100.0);
        assert_eq!(sim.metrics.initial_victims as usize, n);
        assert_eq!(sim.metrics.remaining as usize, n);
        assert!(sim.is_auto());
    }

    #[test]
    fn caches_can_be_disabled() {
        let mut config = SimConfig::default();
        config.scenario.place_caches = false;
        let sim = SimBuilder::new(config).build().unwrap();
        assert!(sim.caches.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SimConfig { grid_size: 1, ..SimConfig::default() };
        let result = SimBuilder::new(config).build();
        assert!(matches!(result, Err(SimError::Core(CoreError::Config(_)))));
    }

    #[test]
    fn override_shape_mismatch_rejected() {
        let result = SimBuilder::new(calm_config(10)).hazards(clear(5)).build();
        assert!(matches!(result, Err(SimError::ShapeMismatch { what: "hazard field", .. })));

        let victims = victims_at(&[(Cell::new(12, 0), 1)]);
        let result = SimBuilder::new(calm_config(10)).victims(victims).build();
        assert!(matches!(result, Err(SimError::ShapeMismatch { what: "victim positions", .. })));
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;
    use crate::RescueOutcome;

    #[test]
    fn same_seed_gives_identical_snapshots() {
        let config = SimConfig { seed: 11, grid_size: 15, disaster: DisasterKind::Fire, ..SimConfig::default() };
        let mut a = SimBuilder::new(config.clone()).build().unwrap();
        let mut b = SimBuilder::new(config).build().unwrap();
        assert_eq!(a.snapshot().to_json().unwrap(), b.snapshot().to_json().unwrap());
        for _ in 0..30 {
            let sa = a.step().unwrap().to_json().unwrap();
            let sb = b.step().unwrap().to_json().unwrap();
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = SimBuilder::new(SimConfig { seed: 1, ..SimConfig::default() }).build().unwrap();
        let b = SimBuilder::new(SimConfig { seed: 2, ..SimConfig::default() }).build().unwrap();
        assert_ne!(a.snapshot().to_json().unwrap(), b.snapshot().to_json().unwrap());
    }

    #[test]
    fn reset_matches_fresh_build() {
        let config = SimConfig { seed: 3, grid_size: 12, disaster: DisasterKind::Flood, ..SimConfig::default() };
        let mut fresh = SimBuilder::new(config).build().unwrap();

        let mut reused = SimBuilder::new(SimConfig::default()).build().unwrap();
        reused.run_steps(7, &mut crate::NoopObserver).unwrap();
        let initial = reused.reset(3, 12, DisasterKind::Flood).unwrap();

        assert_eq!(initial.step.0, 0);
        assert_eq!(initial.to_json().unwrap(), fresh.snapshot().to_json().unwrap());
        for _ in 0..10 {
            assert_eq!(fresh.step().unwrap().to_json().unwrap(), reused.step().unwrap().to_json().unwrap());
        }
    }

    /// Rescue rolls draw from their own stream, so an attempt leaves the
    /// hazard field's evolution untouched.
    #[test]
    fn rescue_rolls_do_not_shift_hazard_spread() {
        let config = SimConfig { seed: 9, grid_size: 12, disaster: DisasterKind::Fire, ..SimConfig::default() };
        let build = || {
            SimBuilder::new(config.clone())
                .victims(victims_at(&[(Cell::new(0, 0), 1)]))
                .auto(false)
                .build()
                .unwrap()
        };
        let mut rolled = build();
        let mut untouched = build();

        let outcome = rolled.attempt_rescue().unwrap();
        assert!(matches!(outcome, RescueOutcome::Rescued { .. } | RescueOutcome::Failed { .. }));
        assert_eq!(rolled.metrics.rescue_attempts, 1);
        for _ in 0..20 {
            let a = rolled.advance().unwrap();
            let b = untouched.advance().unwrap();
            assert_eq!(a.spread, b.spread);
            assert_eq!(rolled.hazards, untouched.hazards);
        }
    }

    #[test]
    fn reset_validates() {
        let mut sim = SimBuilder::new(SimConfig::default()).build().unwrap();
        assert!(sim.reset(1, 0, DisasterKind::Fire).is_err());
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bounds_tests {
    use super::*;

    /// Seeded runs across every disaster: intensities and survival stay in
    /// `[0, 1]`, survival never rises, the agent stays on the grid, and the
    /// victim books balance.
    #[test]
    fn state_stays_in_bounds() {
        for seed in 0..8 {
            for disaster in DisasterKind::ALL {
                let config = SimConfig { seed, grid_size: 12, disaster, ..SimConfig::default() };
                let mut sim = SimBuilder::new(config).build().unwrap();
                let grid = sim.hazards.grid();
                let mut survival: Vec<f64> = sim.victims.iter().map(|v| v.survival).collect();

                for _ in 0..40 {
                    sim.advance().unwrap();

                    assert!(sim.hazards.as_slice().iter().all(|i| (0.0..=1.0).contains(i)));
                    for v in sim.victims.iter() {
                        assert!((0.0..=1.0).contains(&v.survival));
                        assert!(v.survival <= survival[v.id.index()], "{} survival rose", v.id);
                        survival[v.id.index()] = v.survival;
                    }
                    assert!(grid.contains(sim.agent.position));
                    assert!((0.0..=100.0).contains(&sim.agent.energy));
                    assert!(sim.agent.carried <= sim.agent.capacity());

                    let m = &sim.metrics;
                    assert_eq!(m.saved + m.lost + m.remaining, m.initial_victims);
                }
            }
        }
    }
}

// ── Commands and queries ──────────────────────────────────────────────────────

#[cfg(test)]
mod command_tests {
    use er_core::{CacheId, Tick, VictimId};
    use er_planner::Planner;
    use er_victim::VictimError;

    use super::*;
    use crate::{Cache, CollectOutcome, RescueOutcome, SimError};

    #[test]
    fn request_move_accepts_only_adjacent_cells() {
        let mut sim = calm_sim(calm_config(5), clear(5), victims_at(&[(Cell::new(4, 4), 1)]));
        assert!(!sim.request_move(Cell::new(0, 5)));
        assert!(!sim.request_move(Cell::new(1, 1)));
        assert!(!sim.request_move(Cell::new(0, 2)));
        assert_eq!(sim.agent.position, Cell::new(0, 0));

        assert!(sim.request_move(Cell::new(0, 1)));
        assert_eq!(sim.agent.position, Cell::new(0, 1));
        assert!(matches!(sim.try_move(Cell::new(7, 7)), Err(SimError::InvalidCoordinate { .. })));
    }

    #[test]
    fn moving_into_hazard_accumulates_exposure() {
        let hazards = HazardField::from_entries(Grid::new(5), [(Cell::new(1, 0), 0.4)]).unwrap();
        let mut sim = calm_sim(calm_config(5), hazards, victims_at(&[(Cell::new(4, 4), 1)]));
        assert!(sim.request_move(Cell::new(1, 0)));
        assert!((sim.metrics.risk_exposure - 0.4).abs() < 1e-12);
        // 2·(1 + 0) + 3·0.4
        assert!((sim.agent.energy - (100.0 - 3.2)).abs() < 1e-9);
    }

    #[test]
    fn query_risk() {
        let hazards = HazardField::from_entries(Grid::new(5), [(Cell::new(2, 2), 0.6)]).unwrap();
        let sim = calm_sim(calm_config(5), hazards, victims_at(&[(Cell::new(4, 4), 1)]));
        assert_eq!(sim.query_risk(Cell::new(2, 2)).unwrap(), 0.6);
        assert_eq!(sim.query_risk(Cell::new(0, 0)).unwrap(), 0.0);
        assert!(matches!(sim.query_risk(Cell::new(9, 9)), Err(SimError::InvalidCoordinate { .. })));
    }

    #[test]
    fn collect_resource_takes_cache_once() {
        let mut sim = calm_sim(calm_config(5), clear(5), victims_at(&[(Cell::new(4, 4), 1)]));
        sim.caches = vec![Cache {
            id:       CacheId(0),
            position: Cell::new(0, 1),
            kind:     ResourceKind::Boat,
            quantity: 2,
        }];

        assert_eq!(sim.collect_resource(), CollectOutcome::NoCache);
        assert!(sim.request_move(Cell::new(0, 1)));
        assert_eq!(
            sim.collect_resource(),
            CollectOutcome::Collected { cache: CacheId(0), kind: ResourceKind::Boat, quantity: 2 }
        );
        assert_eq!(sim.agent.resources.count(ResourceKind::Boat), 2);
        assert!(sim.caches.is_empty());
        assert_eq!(sim.metrics.resources_collected, 2);
        assert_eq!(sim.collect_resource(), CollectOutcome::NoCache);
    }

    #[test]
    fn rescue_then_deliver() {
        let config = sure_rescue(calm_config(5));
        let mut sim = calm_sim(config, clear(5), victims_at(&[(Cell::new(0, 1), 3)]));

        assert_eq!(sim.attempt_rescue().unwrap(), RescueOutcome::NoVictim);
        assert!(sim.request_move(Cell::new(0, 1)));
        assert_eq!(
            sim.attempt_rescue().unwrap(),
            RescueOutcome::Rescued {
                victim:      VictimId(0),
                resource:    ResourceKind::MedicalSupplies,
                probability: 1.0,
            }
        );
        assert_eq!(sim.metrics.saved, 1);
        assert_eq!(sim.metrics.remaining, 0);
        assert_eq!(sim.metrics.resources_used, 1);
        assert_eq!(sim.metrics.rescue_attempts, 1);
        assert_eq!(sim.agent.carried, 1);
        assert!(sim.is_done());
        assert_eq!(sim.attempt_rescue().unwrap(), RescueOutcome::NoVictim);

        // Not at base yet.
        assert_eq!(sim.drop_off().unwrap(), 0);
        assert!(sim.request_move(Cell::new(0, 0)));
        assert_eq!(sim.drop_off().unwrap(), 1);
        assert_eq!(sim.metrics.delivered, 1);
        assert_eq!(sim.agent.carried, 0);
        sim.check_invariants().unwrap();
    }

    #[test]
    fn failed_rescue_keeps_victim_active() {
        let mut config = calm_config(5);
        config.rescue.base_rate = 0.0;
        let mut sim = calm_sim(config, clear(5), victims_at(&[(Cell::new(0, 1), 3)]));
        assert!(sim.request_move(Cell::new(0, 1)));
        let energy = sim.agent.energy;

        let outcome = sim.attempt_rescue().unwrap();
        assert_eq!(outcome, RescueOutcome::Failed { victim: VictimId(0), probability: 0.0 });
        assert!(!outcome.is_success());
        assert_eq!(sim.metrics.remaining, 1);
        assert_eq!(sim.metrics.rescue_attempts, 1);
        assert_eq!(sim.agent.resources.total(), 2);
        assert_eq!(sim.agent.energy, energy - 5.0);
        // Retry is allowed.
        assert!(matches!(sim.attempt_rescue().unwrap(), RescueOutcome::Failed { .. }));
    }

    #[test]
    fn rescue_refused_without_equipment() {
        let mut config = calm_config(5);
        config.agent.initial_kit.clear();
        let mut sim = calm_sim(config, clear(5), victims_at(&[(Cell::new(0, 1), 3)]));
        assert!(sim.request_move(Cell::new(0, 1)));
        assert_eq!(sim.attempt_rescue().unwrap(), RescueOutcome::NoResources);
        assert_eq!(sim.metrics.rescue_attempts, 0);
    }

    /// 10×10 clear grid, victim five cells away: a five-move, zero-risk route.
    #[test]
    fn recommend_path_on_clear_grid() {
        let sim = calm_sim(calm_config(10), clear(10), victims_at(&[(Cell::new(0, 5), 2)]));
        let rec = sim.recommend_path(None).unwrap().unwrap();
        assert_eq!(rec.victim, VictimId(0));
        assert_eq!(rec.path.len(), 5);
        assert_eq!(rec.path.total_risk, 0.0);
        assert_eq!(rec.path.total_cost, 5.0);
        assert!(!rec.greedy);
        // Severity 2 starts at 0.92 and loses 0.01 per step on clear ground.
        assert!((rec.expected_survival - 0.87).abs() < 1e-9);

        let explicit = sim.recommend_path(Some(VictimId(0))).unwrap().unwrap();
        assert_eq!(explicit.path, rec.path);

        assert!(matches!(
            sim.recommend_path(Some(VictimId(9))),
            Err(SimError::Victim(VictimError::UnknownVictim(_)))
        ));
    }

    #[test]
    fn recommend_path_falls_back_to_greedy() {
        let goal = Cell::new(5, 5);
        let grid = Grid::new(10);
        let ring = (4..=6)
            .flat_map(|r| (4..=6).map(move |c| Cell::new(r, c)))
            .filter(|c| *c != goal)
            .map(|c| (c, 1.0));
        let hazards = HazardField::from_entries(grid, ring).unwrap();
        let sim = calm_sim(calm_config(10), hazards, victims_at(&[(goal, 2)]));

        let rec = sim.recommend_path(None).unwrap().unwrap();
        assert_eq!(rec.victim, VictimId(0));
        assert!(rec.greedy);
        assert!(!rec.path.is_empty());
        assert_ne!(rec.path.goal(), Some(goal));
        assert_eq!(sim.recommend_path(Some(VictimId(0))).unwrap(), Some(rec.clone()));

        // Arrival counts the greedy moves plus the distance still to go.
        let end = rec.path.goal().unwrap();
        let steps = rec.path.len() as u32 + end.step_distance(goal, sim.planner().diagonal());
        assert!((rec.expected_survival - (0.92 - 0.01 * steps as f64)).abs() < 1e-9);
    }

    #[test]
    fn recommend_path_without_active_victims_is_none() {
        let mut sim = calm_sim(calm_config(6), clear(6), victims_at(&[(Cell::new(3, 3), 2)]));
        sim.victims.mark_rescued(VictimId(0), Tick(0)).unwrap();
        assert_eq!(sim.recommend_path(None).unwrap(), None);
        assert!(sim.survival_estimates().is_empty());
    }

    #[test]
    fn survival_estimates_project_decay_to_arrival() {
        let hazards = HazardField::from_entries(Grid::new(10), [(Cell::new(3, 3), 0.4)]).unwrap();
        let sim = calm_sim(
            calm_config(10),
            hazards,
            victims_at(&[(Cell::new(0, 5), 2), (Cell::new(3, 3), 5), (Cell::new(9, 9), 1)]),
        );
        let estimates = sim.survival_estimates();
        assert_eq!(estimates.len(), 3);
        let ids: Vec<VictimId> = estimates.iter().map(|e| e.victim).collect();
        assert_eq!(ids, vec![VictimId(0), VictimId(1), VictimId(2)]);

        assert_eq!(estimates[0].arrival_steps, 5);
        assert!((estimates[0].expected_survival - 0.87).abs() < 1e-9);
        // Critical and in hazard: 0.01 + 0.05·0.4 + 0.02 per step from 0.68.
        assert_eq!(estimates[1].arrival_steps, 6);
        assert!((estimates[1].survival - 0.68).abs() < 1e-12);
        assert!((estimates[1].expected_survival - 0.38).abs() < 1e-9);
        assert_eq!(estimates[2].arrival_steps, 18);
        assert!((estimates[2].expected_survival - 0.82).abs() < 1e-9);
    }

    #[test]
    fn snapshot_json_shape() {
        let hazards = HazardField::from_entries(Grid::new(6), [(Cell::new(3, 3), 0.5)]).unwrap();
        let sim = calm_sim(calm_config(6), hazards, victims_at(&[(Cell::new(5, 5), 4)]));
        let json = sim.snapshot().to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(v["grid_size"], 6);
        assert_eq!(v["disaster"], "earthquake");
        assert_eq!(v["terrain"].as_array().unwrap().len(), 6);
        assert_eq!(v["terrain"][0], "RRRRRR");
        assert_eq!(v["hazards"].as_array().unwrap().len(), 1);
        assert_eq!(v["hazards"][0]["intensity"], 0.5);
        assert_eq!(v["victims"][0]["severity"], 4);
        assert_eq!(v["agent"]["status"], "idle");
        assert_eq!(v["agent"]["resources"]["medical_supplies"], 2);
        assert_eq!(v["metrics"]["remaining"], 1);
        assert_eq!(v["done"], false);
    }
}

// ── Step loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use er_agent::AgentStatus;
    use er_core::{CacheId, Tick, VictimId};
    use er_planner::EscapeTier;

    use super::*;
    use crate::{
        AgentAction, Cache, CollectOutcome, Metrics, MoveReason, RescueOutcome, SimError, SimObserver,
        Snapshot, StepReport,
    };

    fn actions(sim: &mut Sim, n: usize) -> Vec<AgentAction> {
        (0..n).map(|_| sim.advance().unwrap().action).collect()
    }

    fn moved(action: &AgentAction) -> Option<(Cell, MoveReason)> {
        match action {
            AgentAction::Moved { to, reason, .. } => Some((*to, *reason)),
            _ => None,
        }
    }

    #[test]
    fn auto_pilot_rescues_and_delivers() {
        let config = sure_rescue(calm_config(8));
        let mut sim = calm_sim(config, clear(8), victims_at(&[(Cell::new(0, 3), 1)]));
        let acts = actions(&mut sim, 8);

        assert_eq!(moved(&acts[0]), Some((Cell::new(0, 1), MoveReason::Target)));
        assert_eq!(moved(&acts[1]), Some((Cell::new(0, 2), MoveReason::Target)));
        assert_eq!(moved(&acts[2]), Some((Cell::new(0, 3), MoveReason::Target)));
        assert!(matches!(
            acts[3],
            AgentAction::Rescue { outcome: RescueOutcome::Rescued { victim: VictimId(0), .. } }
        ));
        assert_eq!(moved(&acts[4]), Some((Cell::new(0, 2), MoveReason::Base)));
        assert_eq!(moved(&acts[5]), Some((Cell::new(0, 1), MoveReason::Base)));
        assert_eq!(moved(&acts[6]), Some((Cell::new(0, 0), MoveReason::Base)));
        assert_eq!(acts[7], AgentAction::DroppedOff { delivered: 1 });

        assert_eq!(sim.metrics.saved, 1);
        assert_eq!(sim.metrics.delivered, 1);
        assert_eq!(sim.metrics.steps, 8);
        assert!(sim.is_done());
        assert!((sim.metrics.efficiency_score - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn auto_pilot_fetches_equipment_first() {
        let mut config = calm_config(6);
        config.agent.initial_kit.clear();
        let mut sim = calm_sim(config, clear(6), victims_at(&[(Cell::new(0, 4), 1)]));
        sim.caches = vec![Cache {
            id:       CacheId(0),
            position: Cell::new(2, 0),
            kind:     ResourceKind::Ambulance,
            quantity: 2,
        }];
        let acts = actions(&mut sim, 4);

        assert_eq!(moved(&acts[0]), Some((Cell::new(1, 0), MoveReason::Cache)));
        assert_eq!(moved(&acts[1]), Some((Cell::new(2, 0), MoveReason::Cache)));
        assert_eq!(
            acts[2],
            AgentAction::Collect {
                outcome: CollectOutcome::Collected { cache: CacheId(0), kind: ResourceKind::Ambulance, quantity: 2 },
            }
        );
        assert!(matches!(moved(&acts[3]), Some((_, MoveReason::Target))));
        assert!(sim.agent.has_preferred_resource(DisasterKind::Earthquake));
    }

    #[test]
    fn exhausted_agent_rests() {
        let mut sim = calm_sim(calm_config(6), clear(6), victims_at(&[(Cell::new(3, 3), 1)]));
        sim.agent.energy = 0.0;
        let report = sim.advance().unwrap();
        assert_eq!(report.action, AgentAction::Rested { gained: 1.0 });
        assert_eq!(sim.agent.energy, 1.0);
        assert_eq!(sim.agent.position, Cell::new(0, 0));
    }

    /// A carrier drained far from the base alternates rest and moves until
    /// it delivers, and never stalls.
    #[test]
    fn exhausted_carrier_recovers_and_delivers() {
        let pickup = Cell::new(5, 5);
        let mut sim = calm_sim(calm_config(8), clear(8), victims_at(&[(pickup, 1)]));
        sim.victims.mark_rescued(VictimId(0), Tick(0)).unwrap();
        sim.agent.position = pickup;
        sim.agent.status = AgentStatus::Transporting;
        sim.agent.carried = 1;
        sim.agent.energy = 0.0;

        let first = sim.advance().unwrap();
        assert_eq!(first.action, AgentAction::Rested { gained: 1.0 });
        assert_eq!(sim.agent.position, pickup);
        assert_eq!(sim.agent.carried, 1);
        assert_eq!(sim.agent.status, AgentStatus::Transporting);
        assert_eq!(moved(&sim.advance().unwrap().action).map(|(_, r)| r), Some(MoveReason::Base));

        let mut delivered = false;
        for _ in 0..60 {
            let action = sim.advance().unwrap().action;
            assert_ne!(action, AgentAction::Waiting);
            if action == (AgentAction::DroppedOff { delivered: 1 }) {
                delivered = true;
                break;
            }
        }
        assert!(delivered);
        assert_eq!(sim.agent.position, Cell::new(0, 0));
        assert_eq!(sim.agent.carried, 0);
        assert_eq!(sim.metrics.delivered, 1);
        sim.check_invariants().unwrap();
    }

    /// Seeded default runs: an exhausted carrier always rests rather than
    /// waiting in place.
    #[test]
    fn exhausted_carriers_never_wait() {
        for seed in 0..20 {
            let config = SimConfig { seed, grid_size: 12, ..SimConfig::default() };
            let mut sim = SimBuilder::new(config).build().unwrap();
            for _ in 0..100 {
                let stalled = sim.agent.carried > 0 && sim.agent.is_exhausted();
                let report = sim.advance().unwrap();
                if stalled {
                    assert_ne!(report.action, AgentAction::Waiting, "seed {seed} step {}", report.step);
                }
            }
        }
    }

    #[test]
    fn trapped_agent_escapes_toward_clear_ground() {
        let mut config = calm_config(6);
        config.scenario.base = Cell::new(2, 2);
        let grid = Grid::new(6);
        let victim = Cell::new(5, 5);
        let haven = Cell::new(2, 4);
        let hazards = HazardField::from_entries(
            grid,
            grid.cells()
                .filter(|c| *c != haven)
                .map(|c| (c, if c == victim { 1.0 } else { 0.8 })),
        )
        .unwrap();
        let mut sim = calm_sim(config, hazards, victims_at(&[(victim, 1)]));

        let report = sim.advance().unwrap();
        assert_eq!(moved(&report.action), Some((Cell::new(2, 3), MoveReason::Escape(EscapeTier::Clear))));
        // From (2, 3) the haven is one step closer to the victim and tolerable.
        let report = sim.advance().unwrap();
        assert_eq!(moved(&report.action), Some((haven, MoveReason::Greedy)));
    }

    /// Intensity 0.9 under a severity-5 victim: lost well within 14 steps.
    #[test]
    fn victim_in_heavy_hazard_is_lost() {
        let cell = Cell::new(5, 5);
        let hazards = HazardField::from_entries(Grid::new(10), [(cell, 0.9)]).unwrap();
        let config = calm_config(10);
        let grid = Grid::new(10);
        let mut sim = SimBuilder::new(config)
            .terrain(TerrainMap::uniform(grid, TerrainKind::Road))
            .hazards(hazards)
            .victims(victims_at(&[(cell, 5)]))
            .caches(vec![])
            .auto(false)
            .build()
            .unwrap();

        let mut lost_at = None;
        for _ in 0..14 {
            let report = sim.advance().unwrap();
            assert_eq!(report.action, AgentAction::Manual);
            if report.lost.contains(&VictimId(0)) {
                lost_at = Some(report.step);
                assert!(report.done);
                break;
            }
        }
        assert!(lost_at.is_some());
        assert_eq!(sim.metrics.lost, 1);
        assert_eq!(sim.agent.position, Cell::new(0, 0));
        assert!(sim.snapshot().victims.is_empty());
    }

    #[test]
    fn invariant_violation_is_fatal() {
        let mut sim = calm_sim(calm_config(5), clear(5), victims_at(&[(Cell::new(4, 4), 1)]));
        sim.set_auto(false);
        sim.agent.energy = 150.0;
        let err = sim.advance().unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, SimError::Invariant(_)));
    }

    #[test]
    fn report_carries_post_step_metrics() {
        let config = sure_rescue(calm_config(6));
        let mut sim = calm_sim(config, clear(6), victims_at(&[(Cell::new(0, 1), 2)]));
        let first = sim.advance().unwrap();
        assert_eq!(first.metrics, sim.metrics);
        assert_eq!(first.metrics.steps, 1);
        assert_eq!(first.action.label(), "moved");

        let second = sim.advance().unwrap();
        assert_eq!(second.action.label(), "rescued");
        assert_eq!(second.metrics.saved, 1);
        assert_eq!(first.metrics.saved, 0);
    }

    #[derive(Default)]
    struct Counter {
        starts:    u64,
        ends:      u64,
        snapshots: Vec<Tick>,
        ended:     Option<(Tick, u64)>,
    }

    impl SimObserver for Counter {
        fn on_step_start(&mut self, _step: Tick) {
            self.starts += 1;
        }
        fn on_step_end(&mut self, _report: &StepReport) {
            self.ends += 1;
        }
        fn on_snapshot(&mut self, snapshot: &Snapshot) {
            self.snapshots.push(snapshot.step);
        }
        fn on_sim_end(&mut self, final_step: Tick, metrics: &Metrics) {
            self.ended = Some((final_step, metrics.steps));
        }
    }

    #[test]
    fn run_stops_at_total_steps() {
        let mut config = calm_config(10);
        config.total_steps = 5;
        config.output_interval_steps = 2;
        let mut sim = calm_sim(config, clear(10), victims_at(&[(Cell::new(9, 9), 1)]));

        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 5);
        assert_eq!(obs.ends, 5);
        // Snapshots are taken after steps 0, 2 and 4.
        assert_eq!(obs.snapshots, vec![Tick(1), Tick(3), Tick(5)]);
        assert_eq!(obs.ended, Some((Tick(5), 5)));
        assert!(sim.is_done());
    }

    #[test]
    fn run_steps_ignores_limit() {
        let mut config = calm_config(10);
        config.total_steps = 2;
        config.output_interval_steps = 0;
        let mut sim = calm_sim(config, clear(10), victims_at(&[(Cell::new(9, 9), 1)]));
        let mut obs = Counter::default();
        sim.run_steps(4, &mut obs).unwrap();
        assert_eq!(obs.ends, 4);
        assert!(obs.snapshots.is_empty());
        assert_eq!(obs.ended, None);
        assert_eq!(sim.clock.elapsed_steps(), 4);
    }

    #[test]
    fn run_without_victims_ends_immediately() {
        let mut sim = calm_sim(calm_config(5), clear(5), VictimRegistry::new());
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 0);
        assert_eq!(obs.ended, Some((Tick(0), 0)));
    }
}
