//! Recoverable conditions the state machine detects and logs.
//!
//! None of these is ever returned as an error. Each one resolves locally
//! into a re-plan, a no-op, or the terminal transition to `Dead`, and is
//! recorded as a structured `anomaly` field in the log.

use serde::Serialize;

/// A condition that interrupts normal action flow without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    /// A locked food source or enemy disappeared or no longer matches the lock.
    InvalidTargetReference,
    /// A transition was requested after the agent died.
    IllegalTransitionAttempt,
    /// The locked food source ran out mid-meal.
    ExhaustedResource,
    /// Health reached zero.
    TerminalHealthLoss,
}

impl Anomaly {
    /// Stable `snake_case` name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTargetReference => "invalid_target_reference",
            Self::IllegalTransitionAttempt => "illegal_transition_attempt",
            Self::ExhaustedResource => "exhausted_resource",
            Self::TerminalHealthLoss => "terminal_health_loss",
        }
    }
}

impl core::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
