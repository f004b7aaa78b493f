//! Victim-subsystem error type.

use thiserror::Error;

use er_core::{CoreError, VictimId};
use er_field::FieldError;

use crate::VictimStatus;

/// Errors produced by `er-victim`.
#[derive(Debug, Error)]
pub enum VictimError {
    #[error("victim {0} not found")]
    UnknownVictim(VictimId),

    #[error("victim {id} is {status}, not active")]
    NotActive { id: VictimId, status: VictimStatus },

    #[error("severity {0} outside 1..=5")]
    InvalidSeverity(u8),

    #[error("survival probability {value} of victim {id} outside [0, 1]")]
    SurvivalOutOfRange { id: VictimId, value: f64 },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type VictimResult<T> = Result<T, VictimError>;
