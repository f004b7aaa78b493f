//! `er-agent` — the single rescue agent.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`status`]    | `AgentStatus` and its transition table                       |
//! | [`resources`] | `ResourceBag` — multiset of held equipment                   |
//! | [`agent`]     | `RescueAgent` — position, energy, fatigue, carrying, actions |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                               |
//!
//! # Lifecycle
//!
//! ```text
//!        move              begin_rescue            success
//! Idle ───────▶ Moving ───────────────▶ Rescuing ─────────▶ Transporting
//!  ▲              ▲                        │                   │
//!  │              └──────── failure ───────┘                   │
//!  └──────────────────────── drop_off ─────────────────────────┘
//! ```
//!
//! The agent does not plan.  It validates and applies the moves and
//! transactions that `er-sim` decides on.

pub mod agent;
pub mod error;
pub mod resources;
pub mod status;


pub use agent::{MoveCost, RescueAgent};
pub use error::{AgentError, AgentResult};
pub use resources::ResourceBag;
pub use status::AgentStatus;
