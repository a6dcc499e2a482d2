//! Output Chunk Classification
//!
//! Maps a chunk of raw shell output to a boundary classification. The
//! stream has no framing, so classification runs over a pending buffer the
//! sequencer accumulates: a chunk that matches nothing yet is `NoMatch`
//! (more input needed), not an error.
//!
//! Priority is fixed: `EndOfStream` > `PasswordPrompt` >
//! `ConfirmationPrompt` > `CommandBoundary` > `LineBreak`. Prompt patterns
//! are tried before the bare-newline case because prompt text commonly
//! arrives newline-terminated.

use regex::Regex;

use crate::error::Result;
use crate::models::ShellKind;

/// Classification of a chunk of shell output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// The shell process closed its output. Produced by the sequencer from
    /// a closed read, never by text classification.
    EndOfStream,
    /// A password request is waiting for input
    PasswordPrompt,
    /// A yes/no confirmation is waiting for input
    ConfirmationPrompt,
    /// The shell's ready-prompt reappeared; the current command is done
    CommandBoundary,
    /// A plain newline-terminated chunk with no special meaning
    LineBreak,
    /// Nothing recognized yet; more input needed
    NoMatch,
}

/// Classifier with compiled patterns for one target shell
#[derive(Debug)]
pub struct PatternClassifier {
    /// Password request, keyword match is case-insensitive
    password_regex: Regex,
    /// Yes/no confirmation with a `[y/n]`-style marker
    confirmation_regex: Regex,
    /// The shell's own ready-prompt, anchored at the end of the buffer
    boundary_regex: Regex,
}

impl PatternClassifier {
    /// Classifier for the default shell (Bash)
    pub fn new() -> Self {
        Self::for_shell(ShellKind::Bash)
    }

    /// Classifier using the given shell's ready-prompt pattern
    pub fn for_shell(kind: ShellKind) -> Self {
        // Fixed literal patterns; compilation cannot fail at runtime. The
        // prompt patterns extend to the start of the line so the surfaced
        // prompt message carries the whole line (e.g. "[sudo] password for
        // alice:"), not just the keyword.
        Self {
            password_regex: Regex::new(r"(?i)[^\n]*password[^\n:]*:").unwrap(),
            confirmation_regex: Regex::new(
                r"(?i)[^\n]*(?:are you sure|do you want to continue)[^\n]*\[y/n\]",
            )
            .unwrap(),
            boundary_regex: Regex::new(kind.ready_prompt_pattern()).unwrap(),
        }
    }

    /// Classifier with a caller-supplied ready-prompt pattern.
    ///
    /// The pattern should anchor at the end of the buffer (`$`) so partial
    /// output is not mistaken for a boundary.
    pub fn with_boundary_pattern(pattern: &str) -> Result<Self> {
        let boundary_regex = Regex::new(pattern)?;
        let mut classifier = Self::new();
        classifier.boundary_regex = boundary_regex;
        Ok(classifier)
    }

    /// Classify a chunk of raw output.
    ///
    /// Never fails; unrecognized input is `NoMatch`.
    pub fn classify(&self, chunk: &str) -> ChunkKind {
        if self.password_regex.is_match(chunk) {
            ChunkKind::PasswordPrompt
        } else if self.confirmation_regex.is_match(chunk) {
            ChunkKind::ConfirmationPrompt
        } else if self.boundary_regex.is_match(chunk) {
            ChunkKind::CommandBoundary
        } else if chunk.ends_with('\n') {
            ChunkKind::LineBreak
        } else {
            ChunkKind::NoMatch
        }
    }

    /// Split a chunk at the first match of the given classification.
    ///
    /// Returns the text preceding the match (attributable to the current
    /// command's output) and the matched text itself. `None` when the kind
    /// has no pattern or the pattern does not match.
    pub fn split_at_match<'a>(
        &self,
        chunk: &'a str,
        kind: ChunkKind,
    ) -> Option<(&'a str, &'a str)> {
        let regex = match kind {
            ChunkKind::PasswordPrompt => &self.password_regex,
            ChunkKind::ConfirmationPrompt => &self.confirmation_regex,
            ChunkKind::CommandBoundary => &self.boundary_regex,
            _ => return None,
        };
        let found = regex.find(chunk)?;
        Some((&chunk[..found.start()], found.as_str()))
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}
