//! `er-core` — foundational types for the emergency-response simulation engine.
//!
//! This crate is a dependency of every other `er-*` crate.  It has no `er-*`
//! dependencies and few external ones (`rand`, `thiserror`, `serde`,
//! `serde_json`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`cell`]        | `Cell`, `Grid` (flat `row * N + col` indexing, neighbours) |
//! | [`ids`]         | `VictimId`, `CacheId`                                     |
//! | [`time`]        | `Tick`, `SimClock`                                        |
//! | [`rng`]         | `SimRng` (seeded, child streams)                          |
//! | [`kinds`]       | `DisasterKind`, `TerrainKind`, `ResourceKind`             |
//! | [`config`]      | `SimConfig` and its parameter blocks                      |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod kinds;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Cell, Grid};
pub use config::{
    AgentParams, PlannerParams, RescueParams, ScenarioParams, SimConfig, SpreadParams,
    VictimParams,
};
pub use error::{CoreError, CoreResult};
pub use ids::{CacheId, VictimId};
pub use kinds::{DisasterKind, ResourceKind, TerrainKind};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
