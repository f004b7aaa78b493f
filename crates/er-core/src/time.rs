//! Simulation time model.
//!
//! Time is a monotonically increasing integer `Tick`; one tick is one
//! simulation step.  The clock is reset to zero on scenario reset and
//! advanced exactly once per completed step.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ─────────────────────────────────────────────────────────────────

/// Tracks the current step of a running scenario.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self { current_tick: Tick::ZERO }
    }

    /// Advance by exactly one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Back to step zero (scenario reset).
    #[inline]
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// Steps completed since reset.
    #[inline]
    pub fn elapsed_steps(&self) -> u64 {
        self.current_tick.0
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (step {})", self.current_tick, self.current_tick.0)
    }
}
