//! Response Gate
//!
//! The single cross-task handoff point between the sequencer (blocked on an
//! interactive prompt) and whatever delivers the external response. Waiting
//! is a real blocking wait on a oneshot channel, never a sleep-poll loop,
//! and supports cooperative cancellation so a torn-down session cannot
//! leave a waiter hanging forever.
//!
//! Delivery semantics: `deliver` with no outstanding wait buffers the value
//! for the next `await_response`; a later `deliver` before that wait
//! arrives replaces the buffered value.

use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::error::{Error, Result};

#[derive(Default)]
struct GateState {
    /// Sender for the currently outstanding wait, if any
    waiter: Option<oneshot::Sender<String>>,
    /// Response delivered before anyone was waiting
    buffered: Option<String>,
    /// Set once on teardown; all current and future waits resolve Cancelled
    cancelled: bool,
}

/// Blocks one waiting task until a response value arrives from another task
#[derive(Default)]
pub struct ResponseGate {
    state: Mutex<GateState>,
}

impl ResponseGate {
    /// Create an open gate with no pending response
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until a response is delivered or the gate is cancelled.
    ///
    /// At most one wait may be outstanding; a second concurrent call is a
    /// programming error and returns `ResponseGateBusy` without disturbing
    /// the first waiter.
    pub async fn await_response(&self) -> Result<String> {
        let receiver = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| Error::Other("response gate lock poisoned".to_string()))?;

            if state.cancelled {
                return Err(Error::Cancelled);
            }
            if let Some(buffered) = state.buffered.take() {
                return Ok(buffered);
            }
            if state.waiter.is_some() {
                return Err(Error::ResponseGateBusy);
            }

            let (tx, rx) = oneshot::channel();
            state.waiter = Some(tx);
            rx
        };

        // Sender dropped without a value means the gate was cancelled.
        receiver.await.map_err(|_| Error::Cancelled)
    }

    /// Deliver a response from another task.
    ///
    /// Resolves the outstanding wait if there is one, otherwise buffers the
    /// value for the next wait. A no-op after cancellation.
    pub fn deliver(&self, response: impl Into<String>) {
        let response = response.into();
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };

        if state.cancelled {
            return;
        }
        match state.waiter.take() {
            // Receiver dropped concurrently is fine; the waiter is gone.
            Some(waiter) => {
                let _ = waiter.send(response);
            }
            None => {
                state.buffered = Some(response);
            }
        }
    }

    /// Cancel the gate: the outstanding wait (and any future wait) resolves
    /// with `Cancelled` instead of hanging.
    pub fn cancel(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };
        state.cancelled = true;
        state.buffered = None;
        // Dropping the sender wakes the receiver with an error.
        state.waiter.take();
    }

    /// True once `cancel` has been called
    pub fn is_cancelled(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.cancelled)
            .unwrap_or(true)
    }
}
