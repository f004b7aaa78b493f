//! `RescueAgent` — the rescuer's mutable state and the actions that change it.
//!
//! # Energy model
//!
//! | Action      | Energy                                                                 |
//! |-------------|------------------------------------------------------------------------|
//! | move        | `−(move_energy·(1 + difficulty) + risk_energy·intensity) × carry`      |
//! | rescue      | `−rescue_energy` per attempt                                           |
//! | rest        | `+idle_recovery` (carriers only once exhausted)                        |
//!
//! `carry` is `carry_energy_factor` while victims are on board and `1`
//! otherwise.  Energy is clamped to `[0, max_energy]`.
//!
//! `fatigue = 1 − energy / max_energy` and
//! `efficiency = max(min_efficiency, 1 − fatigue_slope × fatigue)`.  An
//! agent at zero energy cannot move or start a rescue until it has rested.
//! An exhausted carrier rests without unloading, so energy spent on the way
//! back to base is always recoverable.

use serde::{Deserialize, Serialize};

use er_core::{AgentParams, Cell, DisasterKind, Grid, ResourceKind};

use crate::{AgentError, AgentResult, AgentStatus, ResourceBag};

/// Energy spent on one accepted move.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct MoveCost {
    pub energy: f64,
    pub from:   Cell,
    pub to:     Cell,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RescueAgent {
    pub position:  Cell,
    pub energy:    f64,
    pub status:    AgentStatus,
    /// Rescued victims on board.
    pub carried:   u32,
    pub resources: ResourceBag,
    #[serde(skip)]
    params:        AgentParams,
}

impl RescueAgent {
    /// Fresh agent at `position` with full energy and the initial kit.
    pub fn new(position: Cell, params: &AgentParams) -> Self {
        Self {
            position,
            energy:    params.max_energy,
            status:    AgentStatus::Idle,
            carried:   0,
            resources: params.initial_kit.iter().copied().collect(),
            params:    params.clone(),
        }
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.params.capacity
    }

    /// `1 − energy / max_energy`, in `[0, 1]`.
    pub fn fatigue(&self) -> f64 {
        (1.0 - self.energy / self.params.max_energy).clamp(0.0, 1.0)
    }

    /// Multiplier on rescue success, in `[min_efficiency, 1]`.
    pub fn efficiency(&self) -> f64 {
        (1.0 - self.params.fatigue_slope * self.fatigue()).max(self.params.min_efficiency)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.energy <= 0.0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.carried >= self.params.capacity
    }

    /// `true` if a rescue could start right now, ignoring position.
    pub fn can_rescue(&self) -> bool {
        !self.is_exhausted() && !self.is_full() && !self.resources.is_empty()
    }

    /// Move one cell.
    ///
    /// Rejected, with no state change, if `to` is off the grid or not
    /// adjacent, if the agent is exhausted, or if the agent is mid-rescue.
    pub fn apply_move(
        &mut self,
        to: Cell,
        grid: Grid,
        difficulty: f64,
        intensity: f64,
        diagonal: bool,
    ) -> AgentResult<MoveCost> {
        grid.check(to)?;
        if !self.position.is_adjacent(to, diagonal) {
            return Err(AgentError::NotAdjacent { from: self.position, to });
        }
        if self.is_exhausted() {
            return Err(AgentError::Exhausted);
        }
        if self.status == AgentStatus::Rescuing {
            return Err(AgentError::InvalidTransition { from: self.status, to: AgentStatus::Moving });
        }
        let next = if self.carried > 0 { AgentStatus::Transporting } else { AgentStatus::Moving };
        self.transition(next)?;

        let carry = if self.carried > 0 { self.params.carry_energy_factor } else { 1.0 };
        let cost = (self.params.move_energy * (1.0 + difficulty) + self.params.risk_energy * intensity) * carry;
        self.energy = (self.energy - cost).max(0.0);

        let from = self.position;
        self.position = to;
        Ok(MoveCost { energy: cost, from, to })
    }

    /// Stay put and recover `idle_recovery` energy.  Returns the energy
    /// regained.
    ///
    /// With nobody on board the agent goes `Idle`.  A carrier may only rest
    /// once exhausted and stays `Transporting`, so it can still reach the
    /// base.
    pub fn rest(&mut self) -> AgentResult<f64> {
        if self.carried == 0 {
            self.transition(AgentStatus::Idle)?;
        } else if !self.is_exhausted() || self.status == AgentStatus::Rescuing {
            return Err(AgentError::InvalidTransition { from: self.status, to: AgentStatus::Idle });
        }
        let before = self.energy;
        self.energy = (self.energy + self.params.idle_recovery).min(self.params.max_energy);
        Ok(self.energy - before)
    }

    /// Enter `Rescuing` and pay the attempt's energy.
    pub fn begin_rescue(&mut self) -> AgentResult<()> {
        if self.is_exhausted() {
            return Err(AgentError::Exhausted);
        }
        if self.is_full() {
            return Err(AgentError::CapacityFull { capacity: self.params.capacity });
        }
        if self.resources.is_empty() {
            return Err(AgentError::NoResources);
        }
        self.transition(AgentStatus::Rescuing)?;
        self.energy = (self.energy - self.params.rescue_energy).max(0.0);
        Ok(())
    }

    /// Leave `Rescuing`.  On success one resource is spent (a preferred kind
    /// for `disaster` if held) and the victim comes on board.
    pub fn finish_rescue(&mut self, success: bool, disaster: DisasterKind) -> AgentResult<Option<ResourceKind>> {
        if self.status != AgentStatus::Rescuing {
            return Err(AgentError::InvalidTransition { from: self.status, to: AgentStatus::Transporting });
        }
        if !success {
            let back = if self.carried > 0 { AgentStatus::Transporting } else { AgentStatus::Moving };
            self.status = back;
            return Ok(None);
        }
        let used = self.resources.take_for(disaster).ok_or(AgentError::NoResources)?;
        self.carried += 1;
        self.transition(AgentStatus::Transporting)?;
        Ok(Some(used))
    }

    /// Pick up one item of equipment.
    pub fn collect(&mut self, kind: ResourceKind) {
        self.resources.add(kind);
    }

    /// `true` if any held item is preferred for `disaster`.
    pub fn has_preferred_resource(&self, disaster: DisasterKind) -> bool {
        self.resources.has_preferred_for(disaster)
    }

    /// Hand over every carried victim.  Returns how many were delivered.
    pub fn drop_off(&mut self) -> AgentResult<u32> {
        if self.carried == 0 {
            return Err(AgentError::NothingCarried);
        }
        self.transition(AgentStatus::Idle)?;
        let delivered = self.carried;
        self.carried = 0;
        Ok(delivered)
    }

    /// Verify energy, position, and load are within bounds.
    pub fn check_invariants(&self, grid: Grid) -> AgentResult<()> {
        grid.check(self.position)?;
        if !(0.0..=self.params.max_energy).contains(&self.energy) {
            return Err(AgentError::EnergyOutOfRange(self.energy));
        }
        if self.carried > self.params.capacity {
            return Err(AgentError::CapacityFull { capacity: self.params.capacity });
        }
        Ok(())
    }

    fn transition(&mut self, to: AgentStatus) -> AgentResult<()> {
        if !self.status.can_transition(to) {
            return Err(AgentError::InvalidTransition { from: self.status, to });
        }
        self.status = to;
        Ok(())
    }
}
