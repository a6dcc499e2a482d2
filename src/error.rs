//! Error types and Result aliases for ShellPilot

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for ShellPilot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ShellPilot
#[derive(Debug)]
pub enum Error {
    // === PTY / process errors ===
    /// Failed to spawn the shell process
    SpawnFailed {
        shell: String,
        reason: String,
    },

    /// Failed to create a PTY for the shell
    PtyCreationFailed {
        shell: String,
        reason: String,
    },

    /// Failed to clone the PTY reader
    PtyReaderCloneFailed {
        reason: String,
    },

    /// Failed to take the PTY writer
    PtyWriterTakeFailed {
        reason: String,
    },

    /// Failed to adjust terminal attributes (termios)
    TermiosFailed {
        reason: String,
    },

    /// Failed to send input to the PTY
    InputSendFailed {
        reason: String,
    },

    // === Execution errors ===
    /// A command produced no output within the idle timeout
    IdleTimeout {
        command: String,
        duration: Duration,
    },

    /// The command sequence is structurally invalid
    MalformedSequence {
        reason: String,
    },

    // === Configuration errors ===
    /// Failed to load a configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse a configuration file
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    // === Internal protocol faults ===
    /// The response gate already has an outstanding waiter
    ResponseGateBusy,

    /// The run was cancelled
    Cancelled,

    /// An error that does not fit the other variants
    Other(String),
}

impl Error {
    /// Whether this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SpawnFailed { shell, reason } => {
                write!(f, "failed to spawn shell '{}': {}", shell, reason)
            }
            Error::PtyCreationFailed { shell, reason } => {
                write!(f, "failed to create PTY for '{}': {}", shell, reason)
            }
            Error::PtyReaderCloneFailed { reason } => {
                write!(f, "failed to clone PTY reader: {}", reason)
            }
            Error::PtyWriterTakeFailed { reason } => {
                write!(f, "failed to take PTY writer: {}", reason)
            }
            Error::TermiosFailed { reason } => {
                write!(f, "failed to configure terminal: {}", reason)
            }
            Error::InputSendFailed { reason } => {
                write!(f, "failed to send input to PTY: {}", reason)
            }
            Error::IdleTimeout { command, duration } => write!(
                f,
                "command '{}' produced no output within {:?}",
                command, duration
            ),
            Error::MalformedSequence { reason } => {
                write!(f, "malformed command sequence: {}", reason)
            }
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "failed to load config '{}': {}", path.display(), reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "failed to parse {} config: {}", format, reason)
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "invalid config for '{}': {}", field, reason)
            }
            Error::ResponseGateBusy => {
                write!(f, "response gate already has an outstanding waiter")
            }
            Error::Cancelled => write!(f, "operation was cancelled"),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Other(err.to_string())
    }
}
