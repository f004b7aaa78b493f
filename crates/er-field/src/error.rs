//! Field-subsystem error type.

use thiserror::Error;

use er_core::{Cell, CoreError};

/// Errors produced by `er-field`.
///
/// Everything except `Core(InvalidCoordinate)` signals a broken invariant.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("hazard intensity {value} at {cell} outside [0, 1]")]
    IntensityOutOfRange { cell: Cell, value: f64 },

    #[error("expected {expected} cells, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type FieldResult<T> = Result<T, FieldError>;
