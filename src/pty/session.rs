//! Shell Session
//!
//! Owns one spawned shell process and its pseudo-terminal for the lifetime
//! of a sequence execution. Exposes line-oriented send/receive; the
//! sequencer is the only consumer.

use async_trait::async_trait;
use portable_pty::Child;
use std::time::Duration;
use uuid::Uuid;

use super::process::{spawn_shell, SpawnedShell};
use super::streams::{PtyStreams, StreamRead};
use crate::classify::ChunkKind;
use crate::config::ShellProfile;
use crate::error::Result;

/// Result of one chunk read from the session
#[derive(Debug)]
pub enum ReadChunk {
    /// Decoded output text (lossy UTF-8)
    Data(String),
    /// No output within the allotted time
    Timeout,
    /// The shell closed its output stream
    Closed,
}

/// Line-oriented I/O seam between the sequencer and a concrete session.
///
/// The production implementation is [`ShellSession`]; tests drive the
/// sequencer against a scripted fake instead.
#[async_trait]
pub trait SessionIo: Send {
    /// Send a line of input (text plus newline) to the shell
    async fn send_line(&mut self, line: &str) -> Result<()>;

    /// Read the next chunk of output, waiting at most `timeout`
    async fn read_chunk(&mut self, timeout: Duration) -> Result<ReadChunk>;

    /// Terminate the shell process and release the PTY
    async fn close(&mut self) -> Result<()>;
}

/// A live interactive shell behind a pseudo-terminal
pub struct ShellSession {
    id: Uuid,
    program: String,
    child: Box<dyn Child + Send + Sync>,
    streams: PtyStreams,
    closed: bool,
}

impl ShellSession {
    /// Spawn the profile's shell and consume its startup greeting, so the
    /// initial ready-prompt is not mistaken for the first command's
    /// boundary.
    pub async fn spawn(profile: &ShellProfile, settle: Duration) -> Result<Self> {
        let SpawnedShell { child, streams } = spawn_shell(&profile.program, &profile.args)?;

        let mut session = Self {
            id: Uuid::new_v4(),
            program: profile.program.clone(),
            child,
            streams,
            closed: false,
        };

        session.discard_greeting(profile, settle).await;
        Ok(session)
    }

    /// Read and drop startup output until the ready-prompt appears or the
    /// settle window elapses.
    async fn discard_greeting(&mut self, profile: &ShellProfile, settle: Duration) {
        let classifier = match profile.classifier() {
            Ok(classifier) => classifier,
            Err(_) => return,
        };

        let mut greeting = String::new();
        loop {
            match self.streams.read_with_timeout(settle).await {
                StreamRead::Data(bytes) => {
                    greeting.push_str(&String::from_utf8_lossy(&bytes));
                    if classifier.classify(&greeting) == ChunkKind::CommandBoundary {
                        break;
                    }
                }
                StreamRead::Timeout | StreamRead::Closed => break,
            }
        }

        if !greeting.is_empty() {
            debug!(
                session = %self.id,
                "discarded {} bytes of shell greeting",
                greeting.len()
            );
        }
    }

    /// Session id, used for log correlation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True while the shell process has not exited
    pub fn is_running(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            _ => false,
        }
    }
}

#[async_trait]
impl SessionIo for ShellSession {
    async fn send_line(&mut self, line: &str) -> Result<()> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.streams.write(&data)
    }

    async fn read_chunk(&mut self, timeout: Duration) -> Result<ReadChunk> {
        match self.streams.read_with_timeout(timeout).await {
            StreamRead::Data(bytes) => {
                Ok(ReadChunk::Data(String::from_utf8_lossy(&bytes).into_owned()))
            }
            StreamRead::Timeout => Ok(ReadChunk::Timeout),
            StreamRead::Closed => Ok(ReadChunk::Closed),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        debug!(session = %self.id, shell = %self.program, "closing shell session");
        if let Err(e) = self.child.kill() {
            // Already-exited children report an error from kill; not fatal.
            debug!(session = %self.id, "kill on close: {}", e);
        }

        // Kill delivery is asynchronous; wait (bounded) until the child is
        // actually reaped so teardown never leaves a half-dead process.
        for _ in 0..50 {
            match self.child.try_wait() {
                Ok(Some(_)) | Err(_) => break,
                Ok(None) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
        Ok(())
    }
}

impl Drop for ShellSession {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.child.kill();
            let _ = self.child.try_wait();
        }
    }
}
