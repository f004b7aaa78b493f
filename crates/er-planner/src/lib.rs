//! `er-planner` — risk-aware routing on the hazard grid.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`path`]     | `Path`, `PlanOutcome`                                       |
//! | [`astar`]    | `Planner` trait, `AStarPlanner`                             |
//! | [`fallback`] | `greedy_fallback`, `emergency_escape`                       |
//! | [`target`]   | `select_target` — which active victim to pursue             |
//! | [`error`]    | `PlannerError`, `PlannerResult<T>`                          |
//!
//! # Cost model
//!
//! Entering a cell costs `1 + risk_weight × intensity`.  Cells at or above
//! `blocked_intensity` cannot be entered.  Internally costs are integer
//! milli-units so the open set has a total order and equal-cost ties break
//! deterministically.
//!
//! No route is cached: hazards change every step, so callers re-plan from
//! scratch each time.

pub mod astar;
pub mod error;
pub mod fallback;
pub mod path;
pub mod target;

#[cfg(test)]
mod tests;

pub use astar::{AStarPlanner, Planner};
pub use error::{PlannerError, PlannerResult};
pub use fallback::{EscapeOutcome, EscapeTier, emergency_escape, greedy_fallback};
pub use path::{Path, PlanOutcome};
pub use target::{Target, select_target};
