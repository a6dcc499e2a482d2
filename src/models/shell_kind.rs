//! Shell Kind Definitions
//!
//! Canonical definition of the target shells the engine can drive. Each
//! kind carries one literal ready-prompt pattern; boundary detection keys
//! off that pattern reappearing, never off bare newlines.

use serde::{Deserialize, Serialize};

/// Type of shell being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    /// Bourne Again Shell
    #[default]
    Bash,
    /// Z Shell
    Zsh,
    /// POSIX sh / Dash
    Sh,
    /// Fish Shell
    Fish,
    /// Other/Unknown shell
    Other,
}

impl ShellKind {
    /// Get a string representation of the shell kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ShellKind::Bash => "bash",
            ShellKind::Zsh => "zsh",
            ShellKind::Sh => "sh",
            ShellKind::Fish => "fish",
            ShellKind::Other => "other",
        }
    }

    /// Get shell kind from a program name or path (case-insensitive)
    pub fn from_program(program: &str) -> Self {
        let name = program
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(program)
            .to_lowercase();
        match name.as_str() {
            "bash" => ShellKind::Bash,
            "zsh" => ShellKind::Zsh,
            "sh" | "dash" | "ash" => ShellKind::Sh,
            "fish" => ShellKind::Fish,
            _ => ShellKind::Other,
        }
    }

    /// The literal ready-prompt pattern for this shell.
    ///
    /// Matches when the shell's own prompt reappears as the final,
    /// unterminated line of the pending output buffer. The pattern covers
    /// the whole prompt line so none of it is attributed to command output,
    /// and anchors strictly at the end of the buffer: a prompt is a line
    /// the shell is still waiting on, so a trailing newline disqualifies
    /// the match.
    pub fn ready_prompt_pattern(&self) -> &'static str {
        match self {
            ShellKind::Bash | ShellKind::Sh => r"[^\n]*\$[ \t]*\z",
            ShellKind::Zsh => r"[^\n]*%[ \t]*\z",
            ShellKind::Fish => r"[^\n]*>[ \t]*\z",
            ShellKind::Other => r"[^\n]*[$%>#][ \t]*\z",
        }
    }
}
