//! Command Sequencer
//!
//! Drives one shell session through an ordered command sequence: sends each
//! command, reads and classifies the unframed output stream, surfaces
//! interactive prompts through the event sink, blocks on the response gate
//! until the external answer arrives, and attributes every piece of output
//! to exactly one command.
//!
//! One state machine handles one-command and many-command sequences alike;
//! the run ends in exactly one of `Completed`, `Failed`, or `Cancelled`,
//! and `on_finished` fires exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use zeroize::Zeroizing;

use crate::ansi::sanitize;
use crate::classify::{ChunkKind, PatternClassifier};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::gate::ResponseGate;
use crate::models::{CommandSequence, PromptEvent, SessionOutcome};
use crate::pty::{ReadChunk, SessionIo, ShellSession};

/// Cooperative cancellation flag shared between the run loop and `abort`
#[derive(Default)]
pub struct CancelFlag {
    notify: Notify,
    flag: AtomicBool,
}

impl CancelFlag {
    /// Request cancellation and wake the run loop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolve when cancellation is requested
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Drives a command sequence against one shell session
pub struct CommandSequencer {
    config: EngineConfig,
    classifier: PatternClassifier,
    gate: Arc<ResponseGate>,
    cancel: Arc<CancelFlag>,
}

impl CommandSequencer {
    /// Build a sequencer for the configured shell.
    ///
    /// Fails if the profile carries a custom ready-prompt pattern that does
    /// not compile.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let classifier = config.shell.classifier()?;
        Ok(Self {
            config,
            classifier,
            gate: Arc::new(ResponseGate::new()),
            cancel: Arc::new(CancelFlag::default()),
        })
    }

    /// The gate external responders deliver into
    pub fn gate(&self) -> Arc<ResponseGate> {
        Arc::clone(&self.gate)
    }

    /// The cancellation flag used by `SequenceExecutor::abort`
    pub fn cancel_flag(&self) -> Arc<CancelFlag> {
        Arc::clone(&self.cancel)
    }

    /// Run the sequence against a freshly spawned shell session.
    ///
    /// Validation happens before any process is spawned; the session is
    /// torn down on every exit path before the outcome is reported.
    pub async fn run(&self, sequence: &CommandSequence, sink: &dyn EventSink) -> SessionOutcome {
        if let Err(e) = sequence.validate() {
            let outcome = SessionOutcome::Failed(e.to_string());
            sink.on_finished(&outcome);
            return outcome;
        }

        let mut session =
            match ShellSession::spawn(&self.config.shell, self.config.greeting_settle()).await {
                Ok(session) => session,
                Err(e) => {
                    let outcome = SessionOutcome::Failed(e.to_string());
                    sink.on_finished(&outcome);
                    return outcome;
                }
            };

        let result = self.drive(&mut session, sequence, sink).await;
        let _ = session.close().await;

        let outcome = Self::outcome_from(result);
        sink.on_finished(&outcome);
        outcome
    }

    /// Run the sequence against a caller-supplied session (the test seam).
    ///
    /// Same contract as [`run`](Self::run): validates first, closes the
    /// session on every exit path, reports `on_finished` exactly once.
    pub async fn run_with_session(
        &self,
        sequence: &CommandSequence,
        session: &mut dyn SessionIo,
        sink: &dyn EventSink,
    ) -> SessionOutcome {
        if let Err(e) = sequence.validate() {
            let outcome = SessionOutcome::Failed(e.to_string());
            sink.on_finished(&outcome);
            return outcome;
        }

        let result = self.drive(session, sequence, sink).await;
        let _ = session.close().await;

        let outcome = Self::outcome_from(result);
        sink.on_finished(&outcome);
        outcome
    }

    fn outcome_from(result: Result<String>) -> SessionOutcome {
        match result {
            Ok(combined) => SessionOutcome::Completed(combined),
            Err(e) if e.is_cancelled() => SessionOutcome::Cancelled,
            Err(e) => SessionOutcome::Failed(e.to_string()),
        }
    }

    /// The per-command read/classify loop
    async fn drive(
        &self,
        session: &mut dyn SessionIo,
        sequence: &CommandSequence,
        sink: &dyn EventSink,
    ) -> Result<String> {
        let total = sequence.total_commands;
        let mut combined: Vec<String> = Vec::new();

        'commands: for entry in &sequence.commands {
            info!("running command {} of {}: {}", entry.order, total, entry.command);
            sink.on_output(&format!(
                "Running command {} of {}: {}",
                entry.order, total, entry.command
            ));

            session.send_line(&entry.command).await?;

            // Sanitized output attributed to this command
            let mut collected = String::new();
            // Raw bytes not yet classified; prompts can arrive split across
            // chunks, so nothing is flushed until a pattern resolves it
            let mut pending = String::new();

            loop {
                if self.cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }

                let read = tokio::select! {
                    _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                    read = session.read_chunk(self.config.idle_timeout()) => read?,
                };

                let chunk = match read {
                    ReadChunk::Data(chunk) => chunk,
                    ReadChunk::Timeout => {
                        return Err(Error::IdleTimeout {
                            command: entry.command.clone(),
                            duration: self.config.idle_timeout(),
                        });
                    }
                    ReadChunk::Closed => {
                        // Early shell exit is a successful termination that
                        // keeps whatever the in-flight command produced.
                        debug!("shell closed its stream during command {}", entry.order);
                        Self::flush_pending(&mut pending, &mut collected, sink);
                        Self::push_collected(&mut combined, &collected);
                        break 'commands;
                    }
                };

                pending.push_str(&chunk);

                let kind = self.classifier.classify(&pending);
                match kind {
                    ChunkKind::PasswordPrompt | ChunkKind::ConfirmationPrompt => {
                        self.handle_prompt(session, sink, &mut pending, &mut collected, kind)
                            .await?;
                    }
                    ChunkKind::CommandBoundary => {
                        let before = self
                            .classifier
                            .split_at_match(&pending, ChunkKind::CommandBoundary)
                            .map(|(before, _)| before.to_string())
                            .unwrap_or_default();
                        pending.clear();

                        let clean = sanitize(&before);
                        if !clean.trim().is_empty() {
                            sink.on_output(&clean);
                            collected.push_str(&clean);
                        }
                        Self::push_collected(&mut combined, &collected);
                        continue 'commands;
                    }
                    ChunkKind::LineBreak => {
                        Self::flush_pending(&mut pending, &mut collected, sink);
                    }
                    ChunkKind::NoMatch | ChunkKind::EndOfStream => {
                        // More input needed
                    }
                }
            }
        }

        Ok(combined.join("\n").trim().to_string())
    }

    /// Surface the prompt, wait for the external response, forward it
    async fn handle_prompt(
        &self,
        session: &mut dyn SessionIo,
        sink: &dyn EventSink,
        pending: &mut String,
        collected: &mut String,
        kind: ChunkKind,
    ) -> Result<()> {
        let (before, matched) = match self.classifier.split_at_match(pending, kind) {
            Some((before, matched)) => (before.to_string(), matched.to_string()),
            None => (String::new(), pending.clone()),
        };
        pending.clear();

        let clean_before = sanitize(&before);
        if !clean_before.trim().is_empty() {
            sink.on_output(&clean_before);
            collected.push_str(&clean_before);
        }

        let message = sanitize(&matched).trim().to_string();
        let prompt = match kind {
            ChunkKind::PasswordPrompt => PromptEvent::password(message),
            _ => PromptEvent::confirmation(message),
        };
        info!("interactive prompt detected: {:?}", prompt.kind);
        sink.on_prompt(&prompt);

        // The sole cross-task handoff: block until the external actor
        // answers or the session is torn down.
        let response = Zeroizing::new(self.gate.await_response().await?);
        session.send_line(&response).await?;

        Ok(())
    }

    /// Move sanitized pending text into the command's collected output
    fn flush_pending(pending: &mut String, collected: &mut String, sink: &dyn EventSink) {
        if pending.is_empty() {
            return;
        }
        let clean = sanitize(pending);
        pending.clear();
        if !clean.trim().is_empty() {
            sink.on_output(&clean);
            collected.push_str(&clean);
        }
    }

    /// Append a command's collected output (if non-empty) to the combined list
    fn push_collected(combined: &mut Vec<String>, collected: &str) {
        let trimmed = collected.trim();
        if !trimmed.is_empty() {
            combined.push(trimmed.to_string());
        }
    }
}

/// A sequence execution running on its own worker task.
///
/// Reading from the shell blocks, so the sequencer never runs on the
/// caller's control flow. The executor owns its gate and cancel flag
/// explicitly and exposes the external entry points: response delivery and
/// abort.
pub struct SequenceExecutor {
    gate: Arc<ResponseGate>,
    cancel: Arc<CancelFlag>,
    handle: JoinHandle<SessionOutcome>,
}

impl SequenceExecutor {
    /// Validate construction and start the run on a dedicated task
    pub fn spawn(
        config: EngineConfig,
        sequence: CommandSequence,
        sink: Box<dyn EventSink>,
    ) -> Result<Self> {
        let sequencer = CommandSequencer::new(config)?;
        let gate = sequencer.gate();
        let cancel = sequencer.cancel_flag();

        let handle = tokio::spawn(async move { sequencer.run(&sequence, sink.as_ref()).await });

        Ok(Self {
            gate,
            cancel,
            handle,
        })
    }

    /// Deliver the external answer to an outstanding prompt
    pub fn submit_response(&self, text: impl Into<String>) {
        self.gate.deliver(text);
    }

    /// Abort the run: unblocks any outstanding response wait, stops the
    /// read loop, and terminates the shell before the outcome is reported
    pub fn abort(&self) {
        self.cancel.cancel();
        self.gate.cancel();
    }

    /// True once the run has reached its terminal state
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the terminal outcome
    pub async fn wait(self) -> SessionOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => SessionOutcome::Failed(format!("sequencer task failed: {}", e)),
        }
    }
}
