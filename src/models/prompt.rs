//! Interactive Prompt Model
//!
//! A prompt event is raised when the classifier recognizes an interactive
//! request embedded in shell output, and is consumed exactly once by the
//! response gate resolution.

use serde::{Deserialize, Serialize};

/// The kind of interactive prompt detected in shell output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    /// A password request (e.g. `sudo`'s "Password:")
    Password,
    /// A yes/no confirmation request
    Confirmation,
}

/// A prompt surfaced to the presentation layer, awaiting an external response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEvent {
    /// What kind of answer the shell is waiting for
    pub kind: PromptKind,
    /// The sanitized prompt text as the shell printed it
    pub message: String,
    /// Fixed option set for confirmation prompts; `None` for passwords
    pub options: Option<Vec<String>>,
}

impl PromptEvent {
    /// A password prompt carrying only the raw prompt text
    pub fn password(message: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Password,
            message: message.into(),
            options: None,
        }
    }

    /// A confirmation prompt with the fixed yes/no option set
    pub fn confirmation(message: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Confirmation,
            message: message.into(),
            options: Some(vec!["yes".to_string(), "no".to_string()]),
        }
    }
}
