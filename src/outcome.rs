//! Game outcome capability.
//!
//! Behaviour controllers report terminal failures here. Delivery is
//! fire-and-forget; a controller reports at most once in its lifetime.
use std::fmt;

use crate::agent::AgentId;

/// Why an agent ended the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// A ranger kept the player within capture distance for long enough.
    Captured,
    /// The player bumped into an agent's trigger volume.
    Contact,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Captured => "captured",
            Self::Contact => "physical contact",
        })
    }
}

/// Terminal notification delivered to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FailureCause {
    /// Agent that ended the round.
    pub agent: AgentId,
    /// What happened.
    pub reason: FailureReason,
}

/// Receiver of terminal game events.
pub trait OutcomeSink {
    /// Reports that the player has failed.
    fn notify_failure(&self, cause: FailureCause);
}
