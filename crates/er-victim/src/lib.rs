//! `er-victim` — victims, their survival decay, and rescue scoring.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`victim`]   | `Victim`, `Severity`, `VictimStatus`                       |
//! | [`registry`] | `VictimRegistry` (owns every victim; id = index)           |
//! | [`scoring`]  | decay formula, survival projection, urgency, rescue odds   |
//! | [`error`]    | `VictimError`, `VictimResult<T>`                           |
//!
//! The registry is the only owner of victim state.  Everything else refers
//! to victims by [`VictimId`](er_core::VictimId).

pub mod error;
pub mod registry;
pub mod scoring;
pub mod victim;


pub use error::{VictimError, VictimResult};
pub use registry::{DecayReport, VictimRegistry};
pub use scoring::{projected_survival, rescue_probability, survival_loss, urgency_bonus};
pub use victim::{Severity, Victim, VictimStatus};
