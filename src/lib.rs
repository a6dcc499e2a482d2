//! ShellPilot - an interactive shell automation engine
//!
//! Given an ordered sequence of shell commands produced elsewhere (an LLM
//! command generator, a playbook, a test harness), ShellPilot drives a real
//! interactive shell through a pseudo-terminal: it streams output
//! incrementally, recognizes password and yes/no prompts embedded in the
//! byte stream, suspends until an external actor supplies the answer, and
//! resumes — per command, until the sequence is exhausted or the shell
//! exits.
//!
//! ## Module Organization
//!
//! - [`models`] - Data structures (CommandSequence, PromptEvent, SessionOutcome)
//! - [`classify`] - Output chunk classification (prompts, boundaries)
//! - [`ansi`] - ANSI escape sequence sanitization
//! - [`gate`] - Cross-task response handoff with cancellation
//! - [`pty`] - PTY process management, lifecycle, I/O streams
//! - [`sequencer`] - The per-command execution state machine
//! - [`events`] - The event sink contract consumed by presentation layers
//! - [`config`] - Engine configuration (shell profile, timeouts)
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use shellpilot::{CommandSequence, EngineConfig, SequenceExecutor};
//! use shellpilot::events::ChannelSink;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let sequence = CommandSequence::single("echo hello");
//! let (sink, mut events) = ChannelSink::new();
//!
//! let executor = SequenceExecutor::spawn(
//!     EngineConfig::default(),
//!     sequence,
//!     Box::new(sink),
//! )?;
//!
//! // Consume events; answer prompts with executor.submit_response(...)
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//!
//! let outcome = executor.wait().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The sequencer runs on its own Tokio task because reading from the shell
//! blocks. Blocking PTY I/O is bridged to async code by dedicated
//! reader/writer threads and channels. The response gate is the single
//! cross-task handoff point: the sequencer blocks in it at an interactive
//! prompt, and whatever answers the prompt delivers into it from outside.
//!
//! ## Safety and Reliability
//!
//! - **No panics:** fallible operations return `Result`
//! - **Bounded waits:** an idle timeout fails hung commands instead of
//!   waiting forever
//! - **Clean teardown:** aborting a run unblocks the gate, stops the read
//!   loop, and kills the shell through one exit path
//! - **Credential hygiene:** password responses are wiped from sequencer
//!   memory after forwarding

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod models;
pub mod pty;
pub mod sequencer;

// Re-exports for core functionality
pub use config::{EngineConfig, ShellProfile};
pub use error::{Error, Result};
pub use models::{CommandEntry, CommandSequence, PromptEvent, PromptKind, SessionOutcome, ShellKind};
pub use sequencer::{CommandSequencer, SequenceExecutor};

// Convenience re-exports for common types
pub use classify::{ChunkKind, PatternClassifier};
pub use events::{ChannelSink, EventSink, SessionEvent};
pub use gate::ResponseGate;
pub use pty::{ReadChunk, SessionIo, ShellSession};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
