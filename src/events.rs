//! Event Sink
//!
//! The contract the sequencer uses to report output, prompts, and the
//! terminal outcome to the presentation layer. `on_finished` is invoked
//! exactly once per run, after which no further calls occur.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::models::{PromptEvent, SessionOutcome};

/// Observer of a running sequence execution.
///
/// Implementations must be cheap and non-blocking; the sequencer invokes
/// them inline between reads, possibly from a worker task.
pub trait EventSink: Send + Sync {
    /// A sanitized chunk of output, or a progress notice
    fn on_output(&self, text: &str);

    /// An interactive prompt is waiting for an external response
    fn on_prompt(&self, prompt: &PromptEvent);

    /// The run reached its terminal state; called exactly once
    fn on_finished(&self, outcome: &SessionOutcome);
}

/// A sink event as a value, for callers that consume a channel instead of
/// implementing [`EventSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Output text or progress notice
    Output { text: String, timestamp: DateTime<Utc> },
    /// Interactive prompt awaiting a response
    Prompt {
        prompt: PromptEvent,
        timestamp: DateTime<Utc>,
    },
    /// Terminal outcome of the run
    Finished {
        outcome: SessionOutcome,
        timestamp: DateTime<Utc>,
    },
}

/// Forwards sink callbacks as [`SessionEvent`] values over a channel
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its event stream
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn on_output(&self, text: &str) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.tx.send(SessionEvent::Output {
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn on_prompt(&self, prompt: &PromptEvent) {
        let _ = self.tx.send(SessionEvent::Prompt {
            prompt: prompt.clone(),
            timestamp: Utc::now(),
        });
    }

    fn on_finished(&self, outcome: &SessionOutcome) {
        let _ = self.tx.send(SessionEvent::Finished {
            outcome: outcome.clone(),
            timestamp: Utc::now(),
        });
    }
}
