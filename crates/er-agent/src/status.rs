//! Agent status state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the agent is doing this step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Stationary; the only state in which energy recovers.
    #[default]
    Idle,
    /// Travelling toward a target with nobody on board.
    Moving,
    /// Mid rescue transaction.
    Rescuing,
    /// Carrying at least one rescued victim.
    Transporting,
}

impl AgentStatus {
    /// Allowed status changes.  Staying in the same status is always allowed.
    ///
    /// | from \ to    | Idle | Moving | Rescuing | Transporting |
    /// |--------------|------|--------|----------|--------------|
    /// | Idle         |  ✓   |   ✓    |    ✓     |              |
    /// | Moving       |  ✓   |   ✓    |    ✓     |              |
    /// | Rescuing     |      |   ✓    |    ✓     |      ✓       |
    /// | Transporting |  ✓   |        |    ✓     |      ✓       |
    pub fn can_transition(self, to: AgentStatus) -> bool {
        use AgentStatus::*;
        self == to
            || matches!(
                (self, to),
                (Idle, Moving)
                    | (Idle, Rescuing)
                    | (Moving, Idle)
                    | (Moving, Rescuing)
                    | (Rescuing, Moving)
                    | (Rescuing, Transporting)
                    | (Transporting, Idle)
                    | (Transporting, Rescuing)
            )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle         => "idle",
            AgentStatus::Moving       => "moving",
            AgentStatus::Rescuing     => "rescuing",
            AgentStatus::Transporting => "transporting",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
