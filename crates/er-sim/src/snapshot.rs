//! Read-only view of the simulation handed to the presentation layer.
//!
//! A `Snapshot` is self-contained and serialises deterministically: hazard
//! entries are row-major, victims and caches are in id order, and the
//! agent's resources are in `ResourceKind` order.  Two runs with the same
//! seed therefore produce byte-identical JSON.

use serde::{Deserialize, Serialize};

use er_agent::{AgentStatus, ResourceBag};
use er_core::{Cell, DisasterKind, Tick, VictimId};
use er_victim::Severity;

use crate::{Cache, Metrics, SimResult};

/// One non-zero cell of the hazard field.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardEntry {
    pub cell:      Cell,
    pub intensity: f64,
}

/// An active victim as shown to the outside.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VictimView {
    pub id:       VictimId,
    pub position: Cell,
    pub severity: Severity,
    pub survival: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub position:   Cell,
    pub energy:     f64,
    pub fatigue:    f64,
    pub efficiency: f64,
    pub status:     AgentStatus,
    pub carried:    u32,
    pub capacity:   u32,
    pub resources:  ResourceBag,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Steps completed so far.
    pub step:      Tick,
    pub grid_size: u32,
    pub disaster:  DisasterKind,
    /// One string per row, one terrain letter per cell.
    pub terrain:   Vec<String>,
    pub hazards:   Vec<HazardEntry>,
    pub victims:   Vec<VictimView>,
    pub agent:     AgentView,
    pub caches:    Vec<Cache>,
    pub base:      Cell,
    pub metrics:   Metrics,
    pub done:      bool,
}

impl Snapshot {
    /// Compact JSON encoding for transport.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
