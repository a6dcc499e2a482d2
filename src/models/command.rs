//! Command Sequence Model
//!
//! The wire types produced by the upstream command generator: an ordered
//! list of single shell commands plus a declared total. The generator is
//! required to split chained commands into separate entries, so a sequence
//! that still carries `&&`/`;`/`|` chaining is rejected here, before any
//! shell process is spawned.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A single command to execute, with advisory metadata from the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Order number, 1-based, dense and strictly increasing
    pub order: u32,

    /// The literal shell command to execute
    pub command: String,

    /// Hint: this command mutates the working directory and later commands
    /// depend on it. Advisory only; the engine does not branch on it.
    #[serde(default, deserialize_with = "flag_from_int_or_bool")]
    pub needs_dir_change: bool,

    /// Hint: this command's success should be verified via filesystem
    /// state. Advisory only; the engine does not branch on it.
    #[serde(default, deserialize_with = "flag_from_int_or_bool")]
    pub needs_file_check: bool,
}

impl CommandEntry {
    /// Create an entry with both advisory flags cleared
    pub fn new(order: u32, command: impl Into<String>) -> Self {
        Self {
            order,
            command: command.into(),
            needs_dir_change: false,
            needs_file_check: false,
        }
    }
}

/// An ordered list of commands plus the generator's declared total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSequence {
    /// Commands in execution order
    pub commands: Vec<CommandEntry>,

    /// Declared length; must equal `commands.len()`
    pub total_commands: usize,
}

impl CommandSequence {
    /// Build a sequence from a list of entries, setting the total
    pub fn new(commands: Vec<CommandEntry>) -> Self {
        let total_commands = commands.len();
        Self {
            commands,
            total_commands,
        }
    }

    /// A one-command sequence; driven by the same state machine as any other
    pub fn single(command: impl Into<String>) -> Self {
        Self::new(vec![CommandEntry::new(1, command)])
    }

    /// Parse a sequence from the generator's JSON wire format
    pub fn from_json(json: &str) -> Result<Self> {
        let sequence: CommandSequence = serde_json::from_str(json)?;
        Ok(sequence)
    }

    /// Structural validation, performed before any process is spawned.
    ///
    /// Rejects empty sequences, a `total_commands` that does not match the
    /// list length, non-dense or non-ascending order numbers, empty command
    /// text, and unquoted command separators.
    pub fn validate(&self) -> Result<()> {
        if self.commands.is_empty() {
            return Err(Error::MalformedSequence {
                reason: "empty command list".to_string(),
            });
        }

        if self.total_commands != self.commands.len() {
            return Err(Error::MalformedSequence {
                reason: format!(
                    "total_commands is {} but {} commands were provided",
                    self.total_commands,
                    self.commands.len()
                ),
            });
        }

        for (index, entry) in self.commands.iter().enumerate() {
            let expected = (index + 1) as u32;
            if entry.order != expected {
                return Err(Error::MalformedSequence {
                    reason: format!(
                        "order must be dense and ascending: expected {} at position {}, got {}",
                        expected,
                        index + 1,
                        entry.order
                    ),
                });
            }

            if entry.command.trim().is_empty() {
                return Err(Error::MalformedSequence {
                    reason: format!("command {} is empty", entry.order),
                });
            }

            if let Some(separator) = find_unquoted_separator(&entry.command) {
                return Err(Error::MalformedSequence {
                    reason: format!(
                        "command {} contains '{}'; chained operations must be split into separate entries",
                        entry.order, separator
                    ),
                });
            }
        }

        Ok(())
    }

    /// Number of commands in the sequence
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if the sequence holds no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Scan for `&&`, `||`, `;` or `|` outside single/double-quoted regions.
///
/// Returns the offending separator. Quote handling is deliberately minimal:
/// just enough to let literal separators through inside quoted arguments.
fn find_unquoted_separator(command: &str) -> Option<&'static str> {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    let mut chars = command.chars().peekable();

    while let Some(ch) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if !in_single => escaped = true,
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '&' if !in_single && !in_double => {
                if chars.peek() == Some(&'&') {
                    return Some("&&");
                }
            }
            ';' if !in_single && !in_double => return Some(";"),
            '|' if !in_single && !in_double => {
                if chars.peek() == Some(&'|') {
                    return Some("||");
                }
                return Some("|");
            }
            _ => {}
        }
    }

    None
}

/// Accept the generator's `0`/`1` integer encoding as well as plain booleans
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Int(i64),
        Bool(bool),
    }

    match IntOrBool::deserialize(deserializer)? {
        IntOrBool::Int(value) => Ok(value != 0),
        IntOrBool::Bool(value) => Ok(value),
    }
}
