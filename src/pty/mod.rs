//! PTY Process Management
//!
//! Spawning the shell on a pseudo-terminal, bridging its blocking I/O to
//! async code, and the session type that owns both for the lifetime of one
//! sequence execution.

pub mod process;
pub mod session;
pub mod streams;

pub use process::{spawn_shell, validate_program, SpawnedShell};
pub use session::{ReadChunk, SessionIo, ShellSession};
pub use streams::{PtyStreams, StreamRead};
