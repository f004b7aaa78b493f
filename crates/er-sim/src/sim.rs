//! The `Sim` struct, its step loop, and the external command surface.

use std::fmt::Display;

use tracing::{debug, info, warn};

use er_agent::{AgentError, MoveCost, RescueAgent};
use er_core::{Cell, DisasterKind, SimClock, SimConfig, SimRng, Tick, VictimId};
use er_field::{HazardField, Overlay, TerrainMap};
use er_planner::{AStarPlanner, Path, PlanOutcome, Planner, emergency_escape, greedy_fallback, select_target};
use er_victim::{VictimError, VictimRegistry, projected_survival, rescue_probability};

use crate::scenario::{Scenario, generate_scenario, run_streams};
use crate::snapshot::{AgentView, HazardEntry, VictimView};
use crate::{
    AgentAction, Cache, CollectOutcome, Metrics, MoveReason, Recommendation, RescueOutcome,
    SimError, SimObserver, SimResult, Snapshot, StepReport, SurvivalEstimate,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim<P>` owns all scenario state and executes one step at a time:
///
/// 1. **Hazards**: [`HazardField::advance`] spreads, jitters, decays, and
///    possibly seeds.
/// 2. **Victims**: [`VictimRegistry::decay`] lowers survival; victims at zero
///    are lost.
/// 3. **Agent** (auto-pilot only): rescue, collect, drop off, rest, or one
///    move chosen from the planner's output.
/// 4. **Checks**: bounds and bookkeeping invariants.  A violation aborts the
///    step with [`SimError::Invariant`].
///
/// Between steps the caller may issue commands ([`request_move`],
/// [`collect_resource`], [`attempt_rescue`], [`drop_off`]) and read-only
/// queries ([`recommend_path`], [`survival_estimates`], [`query_risk`],
/// [`snapshot`]).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
///
/// [`request_move`]: Sim::request_move
/// [`collect_resource`]: Sim::collect_resource
/// [`attempt_rescue`]: Sim::attempt_rescue
/// [`drop_off`]: Sim::drop_off
/// [`recommend_path`]: Sim::recommend_path
/// [`survival_estimates`]: Sim::survival_estimates
/// [`query_risk`]: Sim::query_risk
/// [`snapshot`]: Sim::snapshot
pub struct Sim<P: Planner = AStarPlanner> {
    pub config:  SimConfig,
    /// Counts completed steps.
    pub clock:   SimClock,
    pub terrain: TerrainMap,
    pub hazards: HazardField,
    pub overlay: Overlay,
    pub victims: VictimRegistry,
    pub agent:   RescueAgent,
    /// Caches still on the map, in id order.
    pub caches:  Vec<Cache>,
    pub metrics: Metrics,
    planner:     P,
    hazard_rng:  SimRng,
    rescue_rng:  SimRng,
    auto:        bool,
}

impl<P: Planner> Sim<P> {
    pub(crate) fn from_parts(
        config:   SimConfig,
        planner:  P,
        scenario: Scenario,
        mut rng:  SimRng,
        auto:     bool,
    ) -> Self {
        let agent = RescueAgent::new(config.scenario.base, &config.agent);
        let (hazard_rng, rescue_rng) = run_streams(&mut rng);
        let mut sim = Self {
            clock:   SimClock::new(),
            terrain: scenario.terrain,
            hazards: scenario.hazards,
            overlay: scenario.overlay,
            victims: scenario.victims,
            agent,
            caches:  scenario.caches,
            metrics: Metrics::default(),
            config,
            planner,
            hazard_rng,
            rescue_rng,
            auto,
        };
        sim.metrics.initial_victims = sim.victims.len() as u32;
        // Victims handed in already rescued count as delivered.
        sim.metrics.delivered = sim.victims.rescued_count() as u32;
        sim.refresh_metrics();
        sim
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Discard all state and start a fresh scenario.  Every other config
    /// field is kept.
    pub fn reset(&mut self, seed: u64, grid_size: u32, disaster: DisasterKind) -> SimResult<Snapshot> {
        let mut config = self.config.clone();
        config.seed = seed;
        config.grid_size = grid_size;
        config.disaster = disaster;
        config.validate()?;

        let mut rng = SimRng::new(seed);
        let scenario = generate_scenario(&config, &mut rng)?;
        let (hazard_rng, rescue_rng) = run_streams(&mut rng);

        self.agent = RescueAgent::new(config.scenario.base, &config.agent);
        self.terrain = scenario.terrain;
        self.hazards = scenario.hazards;
        self.overlay = scenario.overlay;
        self.victims = scenario.victims;
        self.caches = scenario.caches;
        self.clock.reset();
        self.metrics = Metrics { initial_victims: self.victims.len() as u32, ..Metrics::default() };
        self.config = config;
        self.hazard_rng = hazard_rng;
        self.rescue_rng = rescue_rng;
        self.refresh_metrics();

        info!(seed, grid = %self.hazards.grid(), %disaster, victims = self.victims.len(), "simulation reset");
        Ok(self.snapshot())
    }

    /// Execute one step and return the resulting snapshot.
    pub fn step(&mut self) -> SimResult<Snapshot> {
        self.advance()?;
        Ok(self.snapshot())
    }

    /// Execute one step and return what happened during it.
    pub fn advance(&mut self) -> SimResult<StepReport> {
        let now = self.clock.current_tick;

        // ── Hazards ───────────────────────────────────────────────────────
        let spread = self
            .hazards
            .advance(
                &self.terrain,
                self.config.disaster,
                now.0,
                &self.config.spread,
                &self.overlay,
                &mut self.hazard_rng,
            )
            .map_err(invariant)?;

        // ── Victims ───────────────────────────────────────────────────────
        let decay = self
            .victims
            .decay(&self.hazards, &self.config.victims, now)
            .map_err(invariant)?;
        for id in &decay.lost {
            info!(victim = %id, step = %now, "victim lost");
        }

        // ── Agent ─────────────────────────────────────────────────────────
        let action = if self.auto { self.auto_act(now)? } else { AgentAction::Manual };

        self.clock.advance();
        self.refresh_metrics();
        self.check_invariants()?;

        let done = self.is_done();
        debug!(
            step = %now,
            coverage = self.hazards.coverage_ratio(),
            energy = self.agent.energy,
            active = self.metrics.remaining,
            ?action,
            "step complete"
        );
        Ok(StepReport {
            step: now,
            spread,
            lost: decay.lost,
            action,
            metrics: self.metrics.clone(),
            done,
        })
    }

    /// Execute exactly `n` steps, ignoring `total_steps` and `is_done`.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        Ok(())
    }

    /// Step until [`is_done`][Sim::is_done].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while !self.is_done() {
            self.observed_step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick, &self.metrics);
        info!(
            steps = self.metrics.steps,
            saved = self.metrics.saved,
            lost = self.metrics.lost,
            efficiency = self.metrics.efficiency_score,
            "simulation finished"
        );
        Ok(())
    }

    /// `true` once no victim is active or `total_steps` (if non-zero) steps
    /// have run.
    pub fn is_done(&self) -> bool {
        self.victims.active_count() == 0
            || (self.config.total_steps > 0 && self.clock.elapsed_steps() >= self.config.total_steps)
    }

    pub fn set_auto(&mut self, auto: bool) {
        self.auto = auto;
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepReport> {
        observer.on_step_start(self.clock.current_tick);
        let report = self.advance()?;
        observer.on_step_end(&report);
        let interval = self.config.output_interval_steps;
        if interval > 0 && report.step.0.is_multiple_of(interval) {
            observer.on_snapshot(&self.snapshot());
        }
        Ok(report)
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Move the agent one cell.  Returns `false`, with nothing changed, if
    /// `to` is off the grid, not adjacent, or the agent cannot move.
    pub fn request_move(&mut self, to: Cell) -> bool {
        match self.try_move(to) {
            Ok(_) => {
                self.refresh_metrics();
                true
            }
            Err(e) => {
                debug!(%to, error = %e, "move rejected");
                false
            }
        }
    }

    /// Like [`request_move`][Sim::request_move] but reports why a move was
    /// rejected.
    pub fn try_move(&mut self, to: Cell) -> SimResult<MoveCost> {
        let grid = self.hazards.grid();
        if !grid.contains(to) {
            return Err(SimError::InvalidCoordinate { cell: to, grid });
        }
        let intensity = self.hazards.get(to);
        let cost = self.agent.apply_move(
            to,
            grid,
            self.terrain.difficulty(to),
            intensity,
            self.planner.diagonal(),
        )?;
        self.metrics.risk_exposure += intensity;
        Ok(cost)
    }

    /// Pick up the cache on the agent's cell, if any.
    pub fn collect_resource(&mut self) -> CollectOutcome {
        let pos = self.agent.position;
        let Some(i) = self.caches.iter().position(|c| c.position == pos) else {
            return CollectOutcome::NoCache;
        };
        let cache = self.caches.remove(i);
        for _ in 0..cache.quantity {
            self.agent.collect(cache.kind);
        }
        self.metrics.resources_collected += cache.quantity;
        info!(
            cache = %cache.id,
            kind = %cache.kind,
            at = %pos,
            held = self.agent.resources.total(),
            "resources collected"
        );
        CollectOutcome::Collected { cache: cache.id, kind: cache.kind, quantity: cache.quantity }
    }

    /// Try to rescue the lowest-id active victim on the agent's cell.
    pub fn attempt_rescue(&mut self) -> SimResult<RescueOutcome> {
        let outcome = self.rescue_at(self.clock.current_tick)?;
        self.refresh_metrics();
        Ok(outcome)
    }

    /// Hand carried victims over at the base.  Returns how many were
    /// delivered; `0` away from the base or with nobody on board.
    pub fn drop_off(&mut self) -> SimResult<u32> {
        if self.agent.position != self.config.scenario.base || self.agent.carried == 0 {
            return Ok(0);
        }
        let delivered = self.agent.drop_off()?;
        self.metrics.delivered += delivered;
        info!(delivered, at = %self.agent.position, "victims delivered");
        Ok(delivered)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Suggested route from the agent to `victim`, or to the best target if
    /// `None`.
    ///
    /// When the planner reaches no victim, the route is a greedy one toward
    /// `victim` or, if `None`, toward the nearest active victim.  `Ok(None)`
    /// means there is nothing to recommend.
    pub fn recommend_path(&self, victim: Option<VictimId>) -> SimResult<Option<Recommendation>> {
        let from = self.agent.position;
        let id = match victim {
            Some(id) => id,
            None => {
                let target = select_target(&self.planner, &self.hazards, from, &self.victims, &self.config.planner)?;
                if let Some(t) = target {
                    return self.recommendation(t.victim, t.path, false).map(Some);
                }
                let Some((id, _)) = self.nearest_active_victim() else {
                    return Ok(None);
                };
                return self.greedy_recommendation(id);
            }
        };

        let target = self.victims.try_get(id)?;
        if !target.is_active() {
            return Err(VictimError::NotActive { id, status: target.status }.into());
        }
        match self.planner.route(&self.hazards, from, target.position)? {
            PlanOutcome::Found(path) => self.recommendation(id, path, false).map(Some),
            PlanOutcome::NoPath      => self.greedy_recommendation(id),
        }
    }

    /// Projected survival of every active victim if the agent headed
    /// straight for it, in id order.  Arrival is the step distance, so the
    /// projection is a best case.
    pub fn survival_estimates(&self) -> Vec<SurvivalEstimate> {
        let pos = self.agent.position;
        let diagonal = self.planner.diagonal();
        self.victims
            .active()
            .map(|v| {
                let arrival_steps = pos.step_distance(v.position, diagonal);
                SurvivalEstimate {
                    victim: v.id,
                    survival: v.survival,
                    arrival_steps,
                    expected_survival: projected_survival(
                        v,
                        self.hazards.get(v.position),
                        &self.config.victims,
                        arrival_steps,
                    ),
                }
            })
            .collect()
    }

    /// Hazard intensity at `cell`.
    pub fn query_risk(&self, cell: Cell) -> SimResult<f64> {
        let grid = self.hazards.grid();
        if !grid.contains(cell) {
            return Err(SimError::InvalidCoordinate { cell, grid });
        }
        Ok(self.hazards.get(cell))
    }

    pub fn snapshot(&self) -> Snapshot {
        let agent = &self.agent;
        Snapshot {
            step:      self.clock.current_tick,
            grid_size: self.hazards.grid().size(),
            disaster:  self.config.disaster,
            terrain:   self.terrain.to_rows(),
            hazards:   self
                .hazards
                .entries()
                .map(|(cell, intensity)| HazardEntry { cell, intensity })
                .collect(),
            victims:   self
                .victims
                .active()
                .map(|v| VictimView { id: v.id, position: v.position, severity: v.severity, survival: v.survival })
                .collect(),
            agent:     AgentView {
                position:   agent.position,
                energy:     agent.energy,
                fatigue:    agent.fatigue(),
                efficiency: agent.efficiency(),
                status:     agent.status,
                carried:    agent.carried,
                capacity:   agent.capacity(),
                resources:  agent.resources.clone(),
            },
            caches:    self.caches.clone(),
            base:      self.config.scenario.base,
            metrics:   self.metrics.clone(),
            done:      self.is_done(),
        }
    }

    // ── Auto-pilot ────────────────────────────────────────────────────────

    /// Decide and perform the agent's action for this step.
    ///
    /// Priority: deliver at base, rest when exhausted, rescue a co-located
    /// victim, pick up a co-located cache, return to base when full, fetch
    /// equipment when empty-handed, then chase the best target.
    fn auto_act(&mut self, now: Tick) -> SimResult<AgentAction> {
        let pos = self.agent.position;
        let base = self.config.scenario.base;

        if self.agent.carried > 0 && pos == base {
            let delivered = self.drop_off()?;
            return Ok(AgentAction::DroppedOff { delivered });
        }
        if self.agent.is_exhausted() {
            return self.stand_by();
        }
        if self.agent.can_rescue() && self.victims.active_at(pos).next().is_some() {
            let outcome = self.rescue_at(now)?;
            return Ok(AgentAction::Rescue { outcome });
        }
        if self.caches.iter().any(|c| c.position == pos) {
            let outcome = self.collect_resource();
            return Ok(AgentAction::Collect { outcome });
        }

        if self.agent.is_full() {
            return self.head_to(base, MoveReason::Base);
        }
        if self.agent.resources.is_empty() {
            let goal = if self.agent.carried == 0 { self.nearest_cache()? } else { None };
            return match goal {
                Some(cache) => self.head_to(cache, MoveReason::Cache),
                None        => self.head_to(base, MoveReason::Base),
            };
        }

        let target = select_target(&self.planner, &self.hazards, pos, &self.victims, &self.config.planner)?;
        if let Some(target) = target {
            return match target.path.next_step() {
                Some(next) => self.move_to(next, MoveReason::Target),
                None       => self.stand_by(),
            };
        }

        // No victim is routable.
        if self.agent.carried > 0 {
            return self.head_to(base, MoveReason::Base);
        }
        if let Some((_, goal)) = self.nearest_active_victim() {
            warn!(%pos, %goal, "no route to any victim, trying greedy fallback");
            return self.fallback_toward(goal);
        }
        self.head_to(base, MoveReason::Base)
    }

    /// One planned move toward `goal`, with greedy and escape fallbacks.
    fn head_to(&mut self, goal: Cell, reason: MoveReason) -> SimResult<AgentAction> {
        let pos = self.agent.position;
        if pos == goal {
            return self.stand_by();
        }
        if let Some(next) = self.planner.route(&self.hazards, pos, goal)?.path().and_then(|p| p.next_step()) {
            return self.move_to(next, reason);
        }
        warn!(%pos, %goal, ?reason, "no path, trying greedy fallback");
        self.fallback_toward(goal)
    }

    fn fallback_toward(&mut self, goal: Cell) -> SimResult<AgentAction> {
        let pos = self.agent.position;
        let greedy = greedy_fallback(&self.planner, &self.hazards, pos, goal, &self.config.planner)?;
        if let Some(next) = greedy.and_then(|p| p.next_step()) {
            return self.move_to(next, MoveReason::Greedy);
        }
        self.escape()
    }

    fn escape(&mut self) -> SimResult<AgentAction> {
        let pos = self.agent.position;
        let escape = emergency_escape(&self.planner, &self.hazards, pos, &self.config.planner)?;
        if escape.cell == pos {
            return self.stand_by();
        }
        warn!(%pos, to = %escape.cell, tier = ?escape.tier, intensity = escape.intensity, "emergency escape");

        let next = if pos.is_adjacent(escape.cell, self.planner.diagonal()) {
            Some(escape.cell)
        } else {
            self.planner.route(&self.hazards, pos, escape.cell)?.into_path().and_then(|p| p.next_step())
        };
        match next {
            Some(next) => self.move_to(next, MoveReason::Escape(escape.tier)),
            None       => self.stand_by(),
        }
    }

    fn move_to(&mut self, next: Cell, reason: MoveReason) -> SimResult<AgentAction> {
        let cost = self.try_move(next)?;
        Ok(AgentAction::Moved { from: cost.from, to: cost.to, energy: cost.energy, reason })
    }

    /// Rest if possible, otherwise wait.  A carrier only rests once
    /// exhausted.
    fn stand_by(&mut self) -> SimResult<AgentAction> {
        if self.agent.carried > 0 && !self.agent.is_exhausted() {
            return Ok(AgentAction::Waiting);
        }
        let gained = self.agent.rest()?;
        Ok(AgentAction::Rested { gained })
    }

    /// Position of the cache with the cheapest route, lowest id on ties.
    fn nearest_cache(&self) -> SimResult<Option<Cell>> {
        let pos = self.agent.position;
        let mut best: Option<(f64, Cell)> = None;
        for cache in &self.caches {
            let PlanOutcome::Found(path) = self.planner.route(&self.hazards, pos, cache.position)? else {
                continue;
            };
            if best.is_none_or(|(cost, _)| path.total_cost < cost) {
                best = Some((path.total_cost, cache.position));
            }
        }
        Ok(best.map(|(_, cell)| cell))
    }

    /// Closest active victim by step distance, lowest id on ties.
    fn nearest_active_victim(&self) -> Option<(VictimId, Cell)> {
        let pos = self.agent.position;
        let diagonal = self.planner.diagonal();
        self.victims
            .active()
            .min_by_key(|v| (v.position.step_distance(pos, diagonal), v.id))
            .map(|v| (v.id, v.position))
    }

    fn greedy_recommendation(&self, id: VictimId) -> SimResult<Option<Recommendation>> {
        let goal = self.victims.try_get(id)?.position;
        let path = greedy_fallback(&self.planner, &self.hazards, self.agent.position, goal, &self.config.planner)?;
        path.map(|path| self.recommendation(id, path, true)).transpose()
    }

    /// Wrap `path` with the victim's survival projected to arrival.  A
    /// greedy path that stops short adds the remaining step distance.
    fn recommendation(&self, id: VictimId, path: Path, greedy: bool) -> SimResult<Recommendation> {
        let victim = self.victims.try_get(id)?;
        let short = path.goal().map_or(0, |end| end.step_distance(victim.position, self.planner.diagonal()));
        let steps = path.len() as u32 + short;
        let expected_survival =
            projected_survival(victim, self.hazards.get(victim.position), &self.config.victims, steps);
        Ok(Recommendation { victim: id, path, greedy, expected_survival })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn rescue_at(&mut self, now: Tick) -> SimResult<RescueOutcome> {
        let pos = self.agent.position;
        let Some(victim) = self.victims.active_at(pos).next().map(|v| v.id) else {
            return Ok(RescueOutcome::NoVictim);
        };
        let disaster = self.config.disaster;
        let probability = rescue_probability(
            &self.config.rescue,
            self.agent.efficiency(),
            self.agent.has_preferred_resource(disaster),
        );

        match self.agent.begin_rescue() {
            Ok(()) => {}
            Err(AgentError::Exhausted)           => return Ok(RescueOutcome::Exhausted),
            Err(AgentError::CapacityFull { .. }) => return Ok(RescueOutcome::CapacityFull),
            Err(AgentError::NoResources)         => return Ok(RescueOutcome::NoResources),
            Err(e)                               => return Err(e.into()),
        }
        self.metrics.rescue_attempts += 1;

        let success = self.rescue_rng.gen_bool(probability);
        match self.agent.finish_rescue(success, disaster)? {
            Some(resource) => {
                self.victims.mark_rescued(victim, now)?;
                self.metrics.resources_used += 1;
                info!(%victim, %resource, probability, at = %pos, "victim rescued");
                Ok(RescueOutcome::Rescued { victim, resource, probability })
            }
            None => {
                debug!(%victim, probability, "rescue attempt failed");
                Ok(RescueOutcome::Failed { victim, probability })
            }
        }
    }

    fn refresh_metrics(&mut self) {
        let m = &mut self.metrics;
        m.steps = self.clock.elapsed_steps();
        m.saved = self.victims.rescued_count() as u32;
        m.lost = self.victims.lost_count() as u32;
        m.remaining = self.victims.active_count() as u32;
        m.total_hazard = self.hazards.total_intensity();
        m.refresh_efficiency();
    }

    /// Bounds on every owned value plus victim bookkeeping.
    pub fn check_invariants(&self) -> SimResult<()> {
        self.hazards.check_invariants().map_err(invariant)?;
        self.victims.check_invariants().map_err(invariant)?;
        self.agent.check_invariants(self.hazards.grid()).map_err(invariant)?;

        let m = &self.metrics;
        if m.saved + m.lost + m.remaining != m.initial_victims {
            return Err(SimError::Invariant(format!(
                "victim accounting: saved {} + lost {} + remaining {} != {}",
                m.saved, m.lost, m.remaining, m.initial_victims
            )));
        }
        if self.agent.carried + m.delivered != m.saved {
            return Err(SimError::Invariant(format!(
                "carried {} + delivered {} != saved {}",
                self.agent.carried, m.delivered, m.saved
            )));
        }
        Ok(())
    }
}

fn invariant<E: Display>(e: E) -> SimError {
    SimError::Invariant(e.to_string())
}
