//! Planner error type.
//!
//! An unreachable goal is not an error: it is `PlanOutcome::NoPath`.

use thiserror::Error;

use er_core::CoreError;
use er_field::FieldError;
use er_victim::VictimError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Victim(#[from] VictimError),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
