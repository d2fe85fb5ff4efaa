//! External pause/resume triggers
//!
//! The gate itself does not care where pause and resume come from. This
//! module supplies the two drivers the CLI uses: a [`ResumeSignal`]
//! abstraction over "the operator said continue" (one line of stdin, or a
//! channel message from a test or embedding program), and the [`AutoPauser`]
//! thread that pauses the gate on a fixed interval and resumes it when the
//! signal fires.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, bounded};
use tracing::{debug, warn};

use super::PauseGate;

/// Blocking wait for an external "resume now" event.
pub trait ResumeSignal: Send + Sync {
    fn wait(&self) -> Result<()>;
}

/// Resume when the operator sends one line (ENTER) on stdin.
pub struct StdinSignal;

impl ResumeSignal for StdinSignal {
    fn wait(&self) -> Result<()> {
        let mut line = String::new();
        let bytes = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read resume input")?;
        ensure!(bytes > 0, "stdin closed while waiting for resume");
        Ok(())
    }
}

/// Resume when a message arrives on a channel.
///
/// Used by tests and by embedders that drive the pause cycle
/// programmatically instead of from a console.
pub struct ChannelSignal {
    rx: Receiver<()>,
}

impl ChannelSignal {
    /// Create the signal plus the sender that fires it.
    pub fn new() -> (Sender<()>, Self) {
        let (tx, rx) = bounded(1);
        (tx, Self { rx })
    }
}

impl ResumeSignal for ChannelSignal {
    fn wait(&self) -> Result<()> {
        self.rx
            .recv()
            .context("resume channel closed while waiting")?;
        Ok(())
    }
}

/// Periodic pause driver.
///
/// Every `interval` the driver pauses the shared gate, runs the `on_pause`
/// callback (the CLI prints a progress snapshot there), waits for the resume
/// signal, and resumes the gate. Stopping the driver disconnects its wakeup
/// channel, so it exits at its next wakeup; pause or resume calls that land
/// after every worker has terminated are harmless no-ops on the gate.
///
/// If the resume signal fails (stdin reaches EOF, the channel is dropped),
/// the driver cancels the gate rather than leaving workers parked forever.
pub struct AutoPauser {
    stop_tx: Sender<()>,
    done: Arc<AtomicBool>,
}

impl AutoPauser {
    pub fn start<F>(
        gate: Arc<PauseGate>,
        interval: Duration,
        signal: Arc<dyn ResumeSignal>,
        on_pause: F,
    ) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let done = Arc::new(AtomicBool::new(false));
        let done_flag = done.clone();

        thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }

                gate.pause();
                if done_flag.load(Ordering::SeqCst) {
                    // The run completed while the timer was firing; undo the
                    // pause instead of prompting for a resume nobody needs.
                    gate.resume();
                    break;
                }
                debug!("auto-pause triggered");
                on_pause();

                if let Err(e) = signal.wait() {
                    warn!("resume signal failed: {e:#}, cancelling run");
                    gate.cancel();
                    break;
                }
                gate.resume();
            }
        });

        Self { stop_tx, done }
    }

    /// Stop the driver. The thread exits at its next wakeup; if it is
    /// blocked waiting on a resume signal it lingers until that signal
    /// fires or the process ends, same as any console prompt.
    pub fn stop(self) {
        self.done.store(true, Ordering::SeqCst);
        drop(self.stop_tx);
    }
}
