//! Engine Configuration
//!
//! Which shell to drive, how its ready-prompt looks, and how long the
//! sequencer tolerates silence before declaring a command hung.

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classify::PatternClassifier;
use crate::error::{Error, Result};
use crate::models::ShellKind;

/// The shell a session spawns and the prompt pattern that marks it ready
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellProfile {
    /// Program to spawn
    pub program: String,
    /// Arguments passed to the shell. Startup files are skipped by default
    /// so the ready-prompt stays at the shell's stock pattern, and line
    /// editing is disabled so the shell does not re-echo input that the
    /// terminal-level echo suppression already hides.
    pub args: Vec<String>,
    /// Shell kind, selects the built-in ready-prompt pattern
    pub kind: ShellKind,
    /// Custom ready-prompt regex, overriding the kind's built-in pattern
    pub ready_prompt: Option<String>,
}

impl Default for ShellProfile {
    fn default() -> Self {
        Self {
            program: "/bin/bash".to_string(),
            args: vec![
                "--norc".to_string(),
                "--noprofile".to_string(),
                "--noediting".to_string(),
            ],
            kind: ShellKind::Bash,
            ready_prompt: None,
        }
    }
}

impl ShellProfile {
    /// Profile for an arbitrary shell program, detecting the kind from its
    /// name. No arguments are assumed for unknown shells.
    pub fn for_program(program: impl Into<String>) -> Self {
        let program = program.into();
        let kind = ShellKind::from_program(&program);
        let args = match kind {
            ShellKind::Bash => vec![
                "--norc".to_string(),
                "--noprofile".to_string(),
                "--noediting".to_string(),
            ],
            ShellKind::Zsh => vec!["-f".to_string(), "--no-zle".to_string()],
            _ => Vec::new(),
        };
        Self {
            program,
            args,
            kind,
            ready_prompt: None,
        }
    }

    /// Build the classifier for this profile's boundary pattern
    pub fn classifier(&self) -> Result<PatternClassifier> {
        match &self.ready_prompt {
            Some(pattern) => PatternClassifier::with_boundary_pattern(pattern),
            None => Ok(PatternClassifier::for_shell(self.kind)),
        }
    }
}

/// Engine-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shell to spawn for each sequence execution
    pub shell: ShellProfile,
    /// Seconds of shell silence tolerated mid-command before the run fails.
    /// An unbounded wait on a hung command is an operational risk, so this
    /// is always bounded.
    pub idle_timeout_secs: u64,
    /// How long to wait for the shell's startup greeting to settle before
    /// the first command is sent
    pub greeting_settle_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shell: ShellProfile::default(),
            idle_timeout_secs: 120,
            greeting_settle_ms: 400,
        }
    }
}

impl EngineConfig {
    /// Idle timeout as a `Duration`
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Greeting settle window as a `Duration`
    pub fn greeting_settle(&self) -> Duration {
        Duration::from_millis(self.greeting_settle_ms)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<()> {
        if self.shell.program.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "shell.program".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.idle_timeout_secs == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "idle_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(pattern) = &self.shell.ready_prompt {
            regex::Regex::new(pattern).map_err(|e| Error::ConfigValidationFailed {
                field: "shell.ready_prompt".to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
