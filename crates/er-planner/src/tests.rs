//! Unit tests for er-planner.

#[cfg(test)]
mod helpers {
    use er_core::{Cell, Grid};
    use er_field::HazardField;

    pub fn clear(n: u32) -> HazardField {
        HazardField::new(Grid::new(n))
    }

    pub fn filled(n: u32, value: f64) -> HazardField {
        let grid = Grid::new(n);
        HazardField::from_entries(grid, grid.cells().map(|c| (c, value))).unwrap()
    }

    /// Wall of intensity-1.0 cells around `goal`'s 4-neighbourhood.
    pub fn enclose(field: &mut HazardField, goal: Cell) {
        let grid = field.grid();
        let ring: Vec<Cell> = grid.neighbors(goal, false).collect();
        for c in ring {
            field.set(c, 1.0).unwrap();
        }
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use er_core::{Cell, CoreError, Grid, PlannerParams, SimRng};
    use er_field::HazardField;

    use super::helpers::{clear, enclose};
    use crate::{AStarPlanner, PlanOutcome, Planner, PlannerError};

    fn assert_well_formed(field: &HazardField, path: &crate::Path, diagonal: bool) {
        let cells = &path.cells;
        for w in cells.windows(2) {
            assert!(w[0].is_adjacent(w[1], diagonal), "{} -> {}", w[0], w[1]);
        }
        let mut seen = cells.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), cells.len(), "repeated cell in {cells:?}");
        let risk: f64 = cells.iter().skip(1).map(|c| field.get(*c)).sum();
        assert!((risk - path.total_risk).abs() < 1e-9);
    }

    #[test]
    fn straight_line_on_clear_grid() {
        let field = clear(10);
        let planner = AStarPlanner::default();
        let outcome = planner.route(&field, Cell::new(2, 2), Cell::new(2, 7)).unwrap();
        let path = outcome.into_path().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.total_risk, 0.0);
        assert!((path.total_cost - 5.0).abs() < 1e-9);
        assert_eq!(path.start(), Some(Cell::new(2, 2)));
        assert_eq!(path.goal(), Some(Cell::new(2, 7)));
        assert_well_formed(&field, &path, false);
    }

    #[test]
    fn same_cell_is_zero_move_path() {
        let field = clear(4);
        let path = AStarPlanner::default()
            .route(&field, Cell::new(1, 1), Cell::new(1, 1))
            .unwrap()
            .into_path()
            .unwrap();
        assert!(path.is_empty());
        assert_eq!(path.next_step(), None);
        assert_eq!(path.total_cost, 0.0);
    }

    #[test]
    fn detours_around_hazard_when_cheaper() {
        let grid = Grid::new(5);
        let mut field = HazardField::new(grid);
        // Column 2, rows 0..=3 at 0.9: straight through costs 1 + 1.5·0.9 extra.
        for row in 0..4 {
            field.set(Cell::new(row, 2), 0.9).unwrap();
        }
        let planner = AStarPlanner::default();
        let path = planner.route(&field, Cell::new(0, 0), Cell::new(0, 4)).unwrap().into_path().unwrap();
        // Through the wall: 4 moves, cost 4 + 1.35 = 5.35.  Around row 4: 12 moves.
        assert_eq!(path.len(), 4);
        assert!((path.total_cost - 5.35).abs() < 1e-9);
        assert_well_formed(&field, &path, false);

        let cautious = AStarPlanner { risk_weight: 20.0, ..AStarPlanner::default() };
        let safe = cautious.route(&field, Cell::new(0, 0), Cell::new(0, 4)).unwrap().into_path().unwrap();
        assert_eq!(safe.total_risk, 0.0);
        assert!(safe.cells.contains(&Cell::new(4, 2)));
        assert_well_formed(&field, &safe, false);
    }

    #[test]
    fn equal_cost_ties_prefer_lower_risk() {
        let grid = Grid::new(3);
        let mut field = HazardField::new(grid);
        for c in [Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 1), Cell::new(1, 2)] {
            field.set(c, 0.5).unwrap();
        }
        let planner = AStarPlanner { risk_weight: 0.0, ..AStarPlanner::default() };
        let path = planner.route(&field, Cell::new(0, 0), Cell::new(2, 2)).unwrap().into_path().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.total_risk, 0.0);
        assert_eq!(
            path.cells,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)]
        );
    }

    #[test]
    fn enclosed_goal_is_no_path() {
        let mut field = clear(10);
        enclose(&mut field, Cell::new(5, 5));
        let outcome = AStarPlanner::default().route(&field, Cell::new(0, 0), Cell::new(5, 5)).unwrap();
        assert_eq!(outcome, PlanOutcome::NoPath);
    }

    #[test]
    fn blocked_goal_is_no_path() {
        let mut field = clear(6);
        field.set(Cell::new(3, 3), 1.0).unwrap();
        let outcome = AStarPlanner::default().route(&field, Cell::new(0, 0), Cell::new(3, 3)).unwrap();
        assert!(!outcome.is_found());
    }

    #[test]
    fn diagonal_moves() {
        let field = clear(8);
        let planner = AStarPlanner { diagonal: true, ..AStarPlanner::default() };
        let path = planner.route(&field, Cell::new(0, 0), Cell::new(5, 5)).unwrap().into_path().unwrap();
        assert_eq!(path.len(), 5);
        assert_well_formed(&field, &path, true);
    }

    #[test]
    fn rejects_off_grid_endpoints() {
        let field = clear(5);
        let err = AStarPlanner::default().route(&field, Cell::new(0, 0), Cell::new(5, 0)).unwrap_err();
        assert!(matches!(err, PlannerError::Core(CoreError::InvalidCoordinate { .. })));
    }

    /// Plain Bellman-Ford relaxation over the same cost model.
    fn reference_cost(field: &HazardField, planner: &AStarPlanner, from: Cell, to: Cell) -> Option<f64> {
        let grid = field.grid();
        let mut dist = vec![f64::INFINITY; grid.cell_count()];
        dist[grid.index(from)] = 0.0;
        for _ in 0..grid.cell_count() {
            let mut changed = false;
            for cell in grid.cells() {
                let d = dist[grid.index(cell)];
                if !d.is_finite() {
                    continue;
                }
                for next in grid.neighbors(cell, planner.diagonal) {
                    if !planner.passable(field, next) {
                        continue;
                    }
                    let nd = d + planner.step_cost(field, next);
                    if nd < dist[grid.index(next)] - 1e-12 {
                        dist[grid.index(next)] = nd;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        let d = dist[grid.index(to)];
        d.is_finite().then_some(d)
    }

    #[test]
    fn random_fields_yield_admissible_optimal_paths() {
        let grid = Grid::new(9);
        let mut rng = SimRng::new(2024);
        for round in 0..40 {
            let diagonal = round % 2 == 1;
            let planner = AStarPlanner::from_params(&PlannerParams { diagonal, ..PlannerParams::default() });
            let mut field = HazardField::new(grid);
            for cell in grid.cells() {
                if rng.gen_bool(0.4) {
                    let v = if rng.gen_bool(0.15) { 1.0 } else { rng.uniform(0.05, 0.95) };
                    field.set(cell, v).unwrap();
                }
            }
            let from = Cell::new(rng.gen_range(0..9), rng.gen_range(0..9));
            let to = Cell::new(rng.gen_range(0..9), rng.gen_range(0..9));

            let outcome = planner.route(&field, from, to).unwrap();
            let expected = if from == to { Some(0.0) } else if planner.passable(&field, to) {
                reference_cost(&field, &planner, from, to)
            } else {
                None
            };
            match (outcome, expected) {
                (PlanOutcome::Found(path), Some(best)) => {
                    assert_eq!(path.start(), Some(from));
                    assert_eq!(path.goal(), Some(to));
                    assert!(path.total_cost >= from.step_distance(to, diagonal) as f64 - 1e-9);
                    assert!((path.total_cost - best).abs() < 1e-6, "round {round}: {} vs {best}", path.total_cost);
                    assert_well_formed(&field, &path, diagonal);
                }
                (PlanOutcome::NoPath, None) => {}
                (got, want) => panic!("round {round}: got {got:?}, reference {want:?}"),
            }
        }
    }

    #[test]
    fn deterministic() {
        let grid = Grid::new(12);
        let mut rng = SimRng::new(5);
        let mut field = HazardField::new(grid);
        for cell in grid.cells() {
            if rng.gen_bool(0.3) {
                field.set(cell, rng.uniform(0.1, 0.6)).unwrap();
            }
        }
        let planner = AStarPlanner::default();
        let a = planner.route(&field, Cell::new(0, 0), Cell::new(11, 11)).unwrap();
        let b = planner.route(&field, Cell::new(0, 0), Cell::new(11, 11)).unwrap();
        assert_eq!(a, b);
    }
}

// ── Fallbacks ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fallback {
    use er_core::{Cell, PlannerParams};

    use super::helpers::{clear, enclose, filled};
    use crate::{AStarPlanner, EscapeTier, PlanOutcome, Planner, emergency_escape, greedy_fallback};

    #[test]
    fn greedy_stops_at_the_wall() {
        let mut field = clear(7);
        enclose(&mut field, Cell::new(3, 3));
        let planner = AStarPlanner::default();
        let params = PlannerParams::default();
        let path = greedy_fallback(&planner, &field, Cell::new(3, 0), Cell::new(3, 3), &params)
            .unwrap()
            .unwrap();
        assert_eq!(path.cells, vec![Cell::new(3, 0), Cell::new(3, 1)]);
        assert!(greedy_fallback(&planner, &field, Cell::new(3, 1), Cell::new(3, 3), &params).unwrap().is_none());
    }

    #[test]
    fn greedy_prefers_cheaper_step_and_respects_tolerance() {
        let mut field = clear(5);
        field.set(Cell::new(0, 1), 0.5).unwrap();
        let planner = AStarPlanner::default();
        let params = PlannerParams::default();
        let path = greedy_fallback(&planner, &field, Cell::new(0, 0), Cell::new(2, 2), &params)
            .unwrap()
            .unwrap();
        assert_eq!(path.next_step(), Some(Cell::new(1, 0)));
        assert_eq!(path.goal(), Some(Cell::new(2, 2)));
        assert_eq!(path.len(), 4);

        // Both improving moves above tolerance: stuck.
        let mut hot = clear(5);
        hot.set(Cell::new(0, 1), 0.8).unwrap();
        hot.set(Cell::new(1, 0), 0.75).unwrap();
        assert!(greedy_fallback(&planner, &hot, Cell::new(0, 0), Cell::new(2, 2), &params).unwrap().is_none());
    }

    /// Enclosed goal: A* reports no path, and escape lands on a cell with the
    /// lowest intensity on the grid.
    #[test]
    fn enclosed_goal_escape_finds_grid_minimum() {
        let mut field = filled(10, 0.5);
        enclose(&mut field, Cell::new(5, 5));
        field.set(Cell::new(2, 2), 0.0).unwrap();
        let planner = AStarPlanner::default();
        let params = PlannerParams::default();

        let outcome = planner.route(&field, Cell::new(0, 0), Cell::new(5, 5)).unwrap();
        assert_eq!(outcome, PlanOutcome::NoPath);

        let escape = emergency_escape(&planner, &field, Cell::new(0, 0), &params).unwrap();
        assert_eq!(escape.cell, Cell::new(2, 2));
        assert_eq!(escape.tier, EscapeTier::Clear);
        assert_eq!(escape.intensity, field.min_intensity());
        assert_eq!(escape.distance, 4);
    }

    #[test]
    fn escape_stays_on_clear_cell() {
        let field = clear(6);
        let planner = AStarPlanner::default();
        let escape = emergency_escape(&planner, &field, Cell::new(2, 2), &PlannerParams::default()).unwrap();
        assert_eq!(escape.cell, Cell::new(2, 2));
        assert_eq!(escape.distance, 0);
    }

    #[test]
    fn escape_tolerable_tier_respects_radius() {
        let mut field = filled(10, 0.5);
        field.set(Cell::new(1, 1), 0.2).unwrap();
        field.set(Cell::new(8, 8), 0.1).unwrap();
        let planner = AStarPlanner::default();
        let escape = emergency_escape(&planner, &field, Cell::new(0, 0), &PlannerParams::default()).unwrap();
        assert_eq!(escape.tier, EscapeTier::Tolerable);
        assert_eq!(escape.cell, Cell::new(1, 1));
        assert!((escape.intensity - 0.2).abs() < 1e-12);
    }

    #[test]
    fn escape_neighbor_tier() {
        let mut field = filled(6, 0.9);
        field.set(Cell::new(3, 4), 0.8).unwrap();
        let planner = AStarPlanner::default();
        let escape = emergency_escape(&planner, &field, Cell::new(3, 3), &PlannerParams::default()).unwrap();
        assert_eq!(escape.tier, EscapeTier::Neighbor);
        assert_eq!(escape.cell, Cell::new(3, 4));
        assert_eq!(escape.distance, 1);
    }

    #[test]
    fn escape_does_not_cross_blocked_cells() {
        // Agent boxed in by 1.0; a clear cell lies just beyond the wall.
        let mut field = filled(7, 0.6);
        enclose(&mut field, Cell::new(3, 3));
        field.set(Cell::new(1, 3), 0.0).unwrap();
        let planner = AStarPlanner::default();
        let escape = emergency_escape(&planner, &field, Cell::new(3, 3), &PlannerParams::default()).unwrap();
        assert_eq!(escape.tier, EscapeTier::Neighbor);
        assert_eq!(escape.distance, 1);
        assert_eq!(escape.intensity, 1.0);
    }
}

// ── Target selection ──────────────────────────────────────────────────────────

#[cfg(test)]
mod target {
    use er_core::{Cell, PlannerParams, VictimId};
    use er_victim::{Severity, VictimRegistry};

    use super::helpers::{clear, enclose};
    use crate::{AStarPlanner, select_target};

    fn sev(n: u8) -> Severity {
        Severity::new(n).unwrap()
    }

    /// 10×10, one victim five moves away, nothing in the way.
    #[test]
    fn single_victim_clear_route() {
        let field = clear(10);
        let mut victims = VictimRegistry::new();
        victims.push(Cell::new(0, 5), sev(2), 0.9).unwrap();
        let t = select_target(&AStarPlanner::default(), &field, Cell::new(0, 0), &victims, &PlannerParams::default())
            .unwrap()
            .unwrap();
        assert_eq!(t.victim, VictimId(0));
        assert_eq!(t.path.len(), 5);
        assert_eq!(t.path.total_risk, 0.0);
    }

    #[test]
    fn nearer_victim_wins_when_equally_urgent() {
        let field = clear(10);
        let mut victims = VictimRegistry::new();
        victims.push(Cell::new(0, 8), sev(3), 0.8).unwrap();
        victims.push(Cell::new(0, 3), sev(3), 0.8).unwrap();
        let t = select_target(&AStarPlanner::default(), &field, Cell::new(0, 0), &victims, &PlannerParams::default())
            .unwrap()
            .unwrap();
        assert_eq!(t.victim, VictimId(1));
    }

    #[test]
    fn ties_go_to_lower_id() {
        let field = clear(9);
        let mut victims = VictimRegistry::new();
        victims.push(Cell::new(4, 0), sev(2), 0.7).unwrap();
        victims.push(Cell::new(0, 4), sev(2), 0.7).unwrap();
        let t = select_target(&AStarPlanner::default(), &field, Cell::new(0, 0), &victims, &PlannerParams::default())
            .unwrap()
            .unwrap();
        assert_eq!(t.victim, VictimId(0));
    }

    #[test]
    fn urgency_can_outweigh_distance() {
        let field = clear(10);
        let mut victims = VictimRegistry::new();
        // score 2
        victims.push(Cell::new(0, 2), sev(1), 1.0).unwrap();
        // score 4 − (3·0.7 + 0.5·4) = −0.1
        victims.push(Cell::new(0, 4), sev(5), 0.3).unwrap();
        let t = select_target(&AStarPlanner::default(), &field, Cell::new(0, 0), &victims, &PlannerParams::default())
            .unwrap()
            .unwrap();
        assert_eq!(t.victim, VictimId(1));
    }

    #[test]
    fn skips_unreachable_and_hopeless_victims() {
        let mut field = clear(10);
        enclose(&mut field, Cell::new(5, 5));
        let mut victims = VictimRegistry::new();
        victims.push(Cell::new(5, 5), sev(5), 0.5).unwrap();
        victims.push(Cell::new(0, 1), sev(5), 0.05).unwrap();
        let params = PlannerParams::default();
        let planner = AStarPlanner::default();
        assert!(select_target(&planner, &field, Cell::new(0, 0), &victims, &params).unwrap().is_none());

        victims.push(Cell::new(9, 9), sev(1), 1.0).unwrap();
        let t = select_target(&planner, &field, Cell::new(0, 0), &victims, &params).unwrap().unwrap();
        assert_eq!(t.victim, VictimId(2));
    }
}
