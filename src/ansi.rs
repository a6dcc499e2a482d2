//! ANSI escape code sanitization
//!
//! Shell output read from a PTY is littered with terminal control sequences.
//! This module strips CSI/OSC escape codes and stray control bytes so that
//! collected output and sink events carry plain text only.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sanitizer for terminal escape sequences
pub struct EscapeSanitizer {
    /// Regex for CSI sequences (`ESC [ ... final-byte`)
    csi_regex: Regex,
    /// Regex for OSC sequences (`ESC ] ... BEL` or `ESC ] ... ESC \`)
    osc_regex: Regex,
    /// Regex for two-byte escapes (`ESC` + single char, e.g. charset selection)
    short_regex: Regex,
}

static DEFAULT_SANITIZER: Lazy<EscapeSanitizer> = Lazy::new(EscapeSanitizer::new);

impl EscapeSanitizer {
    /// Create a new sanitizer with compiled patterns
    pub fn new() -> Self {
        // The patterns are fixed literals; compilation cannot fail at runtime.
        let csi_regex = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
        let osc_regex = Regex::new(r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)?").unwrap();
        let short_regex = Regex::new(r"\x1b[@-Z\\^_=><]").unwrap();
        Self {
            csi_regex,
            osc_regex,
            short_regex,
        }
    }

    /// Remove escape sequences and stray control bytes from a chunk of text.
    ///
    /// Newlines and tabs survive; carriage returns and other C0 control
    /// bytes are dropped. Semantic whitespace is otherwise untouched, and
    /// sanitizing already-clean text returns it unchanged.
    pub fn sanitize(&self, text: &str) -> String {
        let text = self.osc_regex.replace_all(text, "");
        let text = self.csi_regex.replace_all(&text, "");
        let text = self.short_regex.replace_all(&text, "");

        text.chars()
            .filter(|&ch| ch == '\n' || ch == '\t' || !ch.is_control())
            .collect()
    }
}

impl Default for EscapeSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize a chunk with the shared default sanitizer
pub fn sanitize(text: &str) -> String {
    DEFAULT_SANITIZER.sanitize(text)
}
