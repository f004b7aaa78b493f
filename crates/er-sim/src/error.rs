//! Orchestrator error type.
//!
//! Two classes matter to callers:
//!
//! * [`SimError::InvalidCoordinate`] is a rejected request.  Nothing changed
//!   and the simulation can continue.
//! * [`SimError::Invariant`] means a step produced impossible state.  The
//!   step is aborted and the simulation should be reset.
//!
//! Everything else wraps a lower-layer error.

use thiserror::Error;

use er_agent::AgentError;
use er_core::{Cell, CoreError, Grid};
use er_field::FieldError;
use er_planner::PlannerError;
use er_victim::VictimError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("cell {cell} is outside the {grid} grid")]
    InvalidCoordinate { cell: Cell, grid: Grid },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("{what} does not fit the {grid} grid")]
    ShapeMismatch { what: &'static str, grid: Grid },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Victim(#[from] VictimError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// `true` for errors that leave the simulation in an unusable state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SimError::Invariant(_))
    }
}

pub type SimResult<T> = Result<T, SimError>;
