use er_core::{Cell, CoreError};
use thiserror::Error;

use crate::AgentStatus;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent is exhausted (energy 0)")]
    Exhausted,

    #[error("{to} is not one move from {from}")]
    NotAdjacent { from: Cell, to: Cell },

    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: AgentStatus, to: AgentStatus },

    #[error("carrying capacity {capacity} reached")]
    CapacityFull { capacity: u32 },

    #[error("no resources held")]
    NoResources,

    #[error("not carrying any victims")]
    NothingCarried,

    #[error("energy {0} outside [0, max]")]
    EnergyOutOfRange(f64),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AgentResult<T> = Result<T, AgentError>;
