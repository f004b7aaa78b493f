//! `er-field` — the static terrain map and the dynamic hazard field.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`terrain`]   | `TerrainMap` (flat per-cell `TerrainKind`, ring generator)   |
//! | [`hazard`]    | `HazardField`, the per-step spread/decay/seed rule           |
//! | [`overlay`]   | `Overlay` — disaster-shaped multiplicative spread mask        |
//! | [`footprint`] | Initial hazard footprint per disaster kind                   |
//! | [`error`]     | `FieldError`, `FieldResult<T>`                               |
//!
//! Both maps are flat `Vec`s indexed by `row * N + col`.  A hazard intensity
//! of exactly `0.0` means the cell is clear; there is no separate
//! "touched" set.

pub mod error;
pub mod footprint;
pub mod hazard;
pub mod overlay;
pub mod terrain;


pub use error::{FieldError, FieldResult};
pub use footprint::{Footprint, generate_footprint};
pub use hazard::{HazardField, SpreadReport};
pub use overlay::{Edge, Overlay};
pub use terrain::TerrainMap;
