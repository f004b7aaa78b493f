//! A single victim and its lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use er_core::{Cell, Tick, VictimId};

use crate::{VictimError, VictimResult};

// ── Severity ──────────────────────────────────────────────────────────────────

/// Injury severity, `1` (minor) to `5` (critical).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(5);

    pub fn new(level: u8) -> VictimResult<Self> {
        if (1..=5).contains(&level) {
            Ok(Severity(level))
        } else {
            Err(VictimError::InvalidSeverity(level))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Starting survival probability for a victim of this severity:
    /// `max(0.6, 1 − 0.08·(severity − 1))`.
    pub fn initial_survival(self) -> f64 {
        (1.0 - (self.0 as f64 - 1.0) * 0.08).max(0.6)
    }
}

impl TryFrom<u8> for Severity {
    type Error = VictimError;
    fn try_from(level: u8) -> VictimResult<Self> {
        Severity::new(level)
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── VictimStatus ──────────────────────────────────────────────────────────────

/// Lifecycle state.  `Rescued` and `Lost` are terminal and entered once.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum VictimStatus {
    #[default]
    Active,
    Rescued { at: Tick },
    Lost { at: Tick },
}

impl fmt::Display for VictimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VictimStatus::Active        => f.write_str("active"),
            VictimStatus::Rescued { at } => write!(f, "rescued at {at}"),
            VictimStatus::Lost { at }    => write!(f, "lost at {at}"),
        }
    }
}

// ── Victim ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Victim {
    pub id:       VictimId,
    pub position: Cell,
    pub severity: Severity,
    /// Survival probability in `[0, 1]`.  Never increases.
    pub survival: f64,
    pub status:   VictimStatus,
}

impl Victim {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == VictimStatus::Active
    }

    #[inline]
    pub fn is_rescued(&self) -> bool {
        matches!(self.status, VictimStatus::Rescued { .. })
    }

    #[inline]
    pub fn is_lost(&self) -> bool {
        matches!(self.status, VictimStatus::Lost { .. })
    }
}
