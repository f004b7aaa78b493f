//! `VictimRegistry` — the fixed victim set of a scenario.
//!
//! Victims are created once at scenario generation and never removed; a
//! rescued or lost victim keeps its slot so `VictimId` stays a plain index.
//! "Active pool" means the victims whose status is still `Active`.

use tracing::debug;

use er_core::{Cell, Tick, VictimId, VictimParams};
use er_field::HazardField;

use crate::{Severity, Victim, VictimError, VictimResult, VictimStatus, survival_loss};

/// Victims that crossed a threshold during [`VictimRegistry::decay`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecayReport {
    /// Victims whose survival reached zero this step.
    pub lost: Vec<VictimId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VictimRegistry {
    victims: Vec<Victim>,
}

impl VictimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a victim with an explicit survival probability.
    pub fn push(&mut self, position: Cell, severity: Severity, survival: f64) -> VictimResult<VictimId> {
        let id = VictimId(self.victims.len() as u32);
        if !(0.0..=1.0).contains(&survival) {
            return Err(VictimError::SurvivalOutOfRange { id, value: survival });
        }
        self.victims.push(Victim { id, position, severity, survival, status: VictimStatus::Active });
        Ok(id)
    }

    /// Register a victim with the severity's default survival.
    pub fn push_default(&mut self, position: Cell, severity: Severity) -> VictimResult<VictimId> {
        self.push(position, severity, severity.initial_survival())
    }

    pub fn len(&self) -> usize {
        self.victims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.victims.is_empty()
    }

    pub fn get(&self, id: VictimId) -> Option<&Victim> {
        self.victims.get(id.index())
    }

    pub fn try_get(&self, id: VictimId) -> VictimResult<&Victim> {
        self.get(id).ok_or(VictimError::UnknownVictim(id))
    }

    /// Every victim in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Victim> {
        self.victims.iter()
    }

    /// Active victims in id order.
    pub fn active(&self) -> impl Iterator<Item = &Victim> {
        self.victims.iter().filter(|v| v.is_active())
    }

    /// Active victims standing on `cell`, in id order.
    pub fn active_at(&self, cell: Cell) -> impl Iterator<Item = &Victim> {
        self.active().filter(move |v| v.position == cell)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn rescued_count(&self) -> usize {
        self.victims.iter().filter(|v| v.is_rescued()).count()
    }

    pub fn lost_count(&self) -> usize {
        self.victims.iter().filter(|v| v.is_lost()).count()
    }

    /// Apply one step of survival decay to every active victim.
    ///
    /// `Δ = base_decay + hazard_penalty·I(cell) + severity_penalty·[sev ≥ critical]`,
    /// clamped at zero.  A victim reaching zero is marked `Lost { at: now }`.
    pub fn decay(&mut self, field: &HazardField, params: &VictimParams, now: Tick) -> VictimResult<DecayReport> {
        let mut report = DecayReport::default();

        for victim in self.victims.iter_mut().filter(|v| v.is_active()) {
            let intensity = field.try_get(victim.position)?;
            victim.survival = (victim.survival - survival_loss(victim.severity, intensity, params)).max(0.0);
            if victim.survival <= 0.0 {
                victim.status = VictimStatus::Lost { at: now };
                report.lost.push(victim.id);
                debug!(victim = %victim.id, cell = %victim.position, "victim lost");
            }
        }

        self.check_invariants()?;
        Ok(report)
    }

    /// One-shot transition `Active → Rescued`.
    pub fn mark_rescued(&mut self, id: VictimId, now: Tick) -> VictimResult<()> {
        let victim = self.victims.get_mut(id.index()).ok_or(VictimError::UnknownVictim(id))?;
        if !victim.is_active() {
            return Err(VictimError::NotActive { id, status: victim.status });
        }
        victim.status = VictimStatus::Rescued { at: now };
        Ok(())
    }

    /// Verify every survival probability is in `[0, 1]`.
    pub fn check_invariants(&self) -> VictimResult<()> {
        for v in &self.victims {
            if !(0.0..=1.0).contains(&v.survival) {
                return Err(VictimError::SurvivalOutOfRange { id: v.id, value: v.survival });
            }
        }
        Ok(())
    }
}
