//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::Cell;

/// The base error type for `er-core` and the configuration layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate {cell} outside {size}x{size} grid")]
    InvalidCoordinate { cell: Cell, size: u32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type for `er-core`.
pub type CoreResult<T> = Result<T, CoreError>;
