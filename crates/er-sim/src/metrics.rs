//! Running scenario metrics.

use serde::{Deserialize, Serialize};

/// Counters reported in every snapshot.
///
/// `saved + lost + remaining == initial_victims` at all times.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub steps:               u64,
    pub initial_victims:     u32,
    pub saved:               u32,
    pub lost:                u32,
    pub remaining:           u32,
    /// Rescued victims handed over at the base.
    pub delivered:           u32,
    /// Items spent on successful rescues.
    pub resources_used:      u32,
    pub resources_collected: u32,
    pub rescue_attempts:     u32,
    /// Sum of the hazard intensity of every cell the agent entered.
    pub risk_exposure:       f64,
    /// Sum of intensity over the whole field.
    pub total_hazard:        f64,
    pub efficiency_score:    f64,
}

impl Metrics {
    /// `saved / max(1, resources_used + steps)`.
    pub fn efficiency(saved: u32, resources_used: u32, steps: u64) -> f64 {
        saved as f64 / (resources_used as u64 + steps).max(1) as f64
    }

    pub(crate) fn refresh_efficiency(&mut self) {
        self.efficiency_score = Self::efficiency(self.saved, self.resources_used, self.steps);
    }
}
