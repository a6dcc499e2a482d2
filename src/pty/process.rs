//! PTY Process Spawning
//!
//! Spawns the target shell inside a pseudoterminal via `portable-pty`, so
//! the child believes it is attached to an interactive terminal and emits
//! its password/confirmation prompts on the readable stream. Input echo is
//! cleared on the terminal before the shell starts, so sent commands and
//! responses are not double-reported in output.

use portable_pty::{native_pty_system, Child, CommandBuilder, PtyPair, PtySize};
use std::io::{Read, Write};
use std::sync::mpsc::channel;
use std::thread;
use tokio::sync::mpsc::unbounded_channel;

use super::streams::PtyStreams;
use crate::error::{Error, Result};

/// Handle to the spawned shell process, paired with its I/O streams
pub struct SpawnedShell {
    pub child: Box<dyn Child + Send + Sync>,
    pub streams: PtyStreams,
}

/// Check that the shell program exists before allocating a PTY for it.
///
/// Exec failures after fork are not reliably reported by the PTY layer, so
/// a missing shell is caught here and surfaced as a spawn error.
pub fn validate_program(program: &str) -> Result<()> {
    let candidate = std::path::Path::new(program);
    let found = if candidate.is_absolute() || program.contains('/') {
        candidate.exists()
    } else {
        std::env::var_os("PATH")
            .map(|paths| {
                std::env::split_paths(&paths).any(|dir| dir.join(program).exists())
            })
            .unwrap_or(false)
    };

    if found {
        Ok(())
    } else {
        Err(Error::SpawnFailed {
            shell: program.to_string(),
            reason: "program not found".to_string(),
        })
    }
}

/// Spawn a shell process on a fresh PTY with echo suppressed
pub fn spawn_shell(program: &str, args: &[String]) -> Result<SpawnedShell> {
    validate_program(program)?;

    let pty_system = native_pty_system();

    let pair = pty_system
        .openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| Error::PtyCreationFailed {
            shell: program.to_string(),
            reason: e.to_string(),
        })?;

    suppress_echo(&pair)?;

    let mut cmd_builder = CommandBuilder::new(program);
    cmd_builder.args(args);

    let child = pair
        .slave
        .spawn_command(cmd_builder)
        .map_err(|e| Error::SpawnFailed {
            shell: program.to_string(),
            reason: e.to_string(),
        })?;

    debug!(
        "spawned shell '{}' (pid {:?})",
        program,
        child.process_id()
    );

    let streams = create_pty_streams(pair)?;

    Ok(SpawnedShell { child, streams })
}

/// Clear the ECHO flag on the PTY so sent input does not come back as output
#[cfg(unix)]
fn suppress_echo(pair: &PtyPair) -> Result<()> {
    use nix::sys::termios::{tcgetattr, tcsetattr, LocalFlags, SetArg};
    use std::os::fd::BorrowedFd;

    let raw_fd = match pair.master.as_raw_fd() {
        Some(fd) => fd,
        None => {
            return Err(Error::TermiosFailed {
                reason: "PTY master exposes no file descriptor".to_string(),
            })
        }
    };
    // The fd is owned by the master for the duration of this call.
    let fd = unsafe { BorrowedFd::borrow_raw(raw_fd) };

    let mut attrs = tcgetattr(fd).map_err(|e| Error::TermiosFailed {
        reason: e.to_string(),
    })?;
    attrs.local_flags.remove(LocalFlags::ECHO);
    tcsetattr(fd, SetArg::TCSANOW, &attrs).map_err(|e| Error::TermiosFailed {
        reason: e.to_string(),
    })?;

    Ok(())
}

#[cfg(not(unix))]
fn suppress_echo(_pair: &PtyPair) -> Result<()> {
    // ConPTY has no termios; echo shows up in output and is handled by the
    // boundary classification instead.
    Ok(())
}

/// Bridge blocking PTY I/O to async channels with reader/writer threads
fn create_pty_streams(pair: PtyPair) -> Result<PtyStreams> {
    let mut master_reader =
        pair.master
            .try_clone_reader()
            .map_err(|e| Error::PtyReaderCloneFailed {
                reason: e.to_string(),
            })?;
    let mut master_writer = pair
        .master
        .take_writer()
        .map_err(|e| Error::PtyWriterTakeFailed {
            reason: e.to_string(),
        })?;

    // Keep the master half alive for the lifetime of the bridge threads;
    // dropping it would hang up the slave side under some PTY backends.
    let master = pair.master;

    // Channel: PTY output -> async consumer
    let (tx_out, rx_out) = unbounded_channel::<Vec<u8>>();
    // Channel: async producer (stdin) -> PTY writer thread
    let (tx_stdin, rx_stdin) = channel::<Vec<u8>>();

    // Reader thread: forward PTY output until EOF or the consumer is gone
    thread::spawn(move || {
        let _master = master;
        let mut buf = [0u8; 4096];

        loop {
            match master_reader.read(&mut buf) {
                Ok(0) => {
                    debug!("PTY read EOF, shell terminated");
                    break;
                }
                Ok(n) => {
                    if tx_out.send(buf[..n].to_vec()).is_err() {
                        debug!("PTY output receiver dropped, stopping reader thread");
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
                Err(e) => {
                    debug!("PTY read error, stopping reader thread: {}", e);
                    break;
                }
            }
        }
    });

    // Writer thread: forward stdin data until the input channel closes
    thread::spawn(move || {
        while let Ok(data) = rx_stdin.recv() {
            if let Err(e) = master_writer.write_all(&data) {
                if e.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                warn!("PTY write error, stopping writer thread: {}", e);
                break;
            }
            if let Err(e) = master_writer.flush() {
                debug!("PTY flush error: {}", e);
            }
        }
    });

    Ok(PtyStreams::from_channels(rx_out, tx_stdin))
}
