//! PTY Streams
//!
//! Async-friendly interface for PTY I/O: blocking master reads/writes are
//! bridged to async code through channels fed by dedicated threads.

use std::sync::mpsc::Sender as StdSender;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::{Error, Result};

/// Result of one read attempt against the PTY output channel
#[derive(Debug)]
pub enum StreamRead {
    /// Bytes produced by the shell
    Data(Vec<u8>),
    /// No output within the allotted time
    Timeout,
    /// The reader thread hung up: the shell closed its output
    Closed,
}

/// PTY I/O streams wrapper
pub struct PtyStreams {
    /// Receiver for output bytes from the PTY (stdout/stderr are one stream)
    output_rx: UnboundedReceiver<Vec<u8>>,
    /// Sender for input bytes to the PTY (stdin)
    input_tx: StdSender<Vec<u8>>,
}

impl PtyStreams {
    /// Create new PTY streams from channels
    pub fn from_channels(
        output_rx: UnboundedReceiver<Vec<u8>>,
        input_tx: StdSender<Vec<u8>>,
    ) -> Self {
        Self {
            output_rx,
            input_tx,
        }
    }

    /// Write data to the PTY stdin
    pub fn write(&self, data: &[u8]) -> Result<()> {
        self.input_tx
            .send(data.to_vec())
            .map_err(|e| Error::InputSendFailed {
                reason: e.to_string(),
            })
    }

    /// Read the next chunk of output, waiting indefinitely
    pub async fn read(&mut self) -> StreamRead {
        match self.output_rx.recv().await {
            Some(bytes) => StreamRead::Data(bytes),
            None => StreamRead::Closed,
        }
    }

    /// Read the next chunk of output, waiting at most `timeout`
    pub async fn read_with_timeout(&mut self, timeout: Duration) -> StreamRead {
        match tokio::time::timeout(timeout, self.output_rx.recv()).await {
            Ok(Some(bytes)) => StreamRead::Data(bytes),
            Ok(None) => StreamRead::Closed,
            Err(_) => StreamRead::Timeout,
        }
    }

    /// Drain all pending output from the channel (discard it).
    ///
    /// Used when consuming the shell's startup greeting so stale output is
    /// not attributed to the first command.
    pub fn drain_output(&mut self) -> usize {
        let mut count = 0;
        while self.output_rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}
