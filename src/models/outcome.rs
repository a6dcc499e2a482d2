//! Session Outcome Model

use serde::{Deserialize, Serialize};

/// Terminal result of running a full command sequence.
///
/// Exactly one outcome is produced per run. `Completed` with an empty
/// string means the sequence ran and produced no output, which is distinct
/// from a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// All commands ran (or the shell exited early); carries the sanitized,
    /// newline-joined output of every command in order
    Completed(String),
    /// The sequence could not run to completion; carries a human-readable
    /// reason
    Failed(String),
    /// The caller aborted the run; not an execution error
    Cancelled,
}

impl SessionOutcome {
    /// True when the sequence ran to a terminal state without failing
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionOutcome::Completed(_))
    }

    /// The combined output, if the sequence completed
    pub fn output(&self) -> Option<&str> {
        match self {
            SessionOutcome::Completed(output) => Some(output),
            _ => None,
        }
    }
}
