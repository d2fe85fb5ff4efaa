//! Shared pause/resume gate
//!
//! One controller pauses and resumes; many workers call [`PauseGate::checkpoint`]
//! at a cadence of their choosing. A paused checkpoint blocks on a condition
//! variable (no CPU consumed) until the controller resumes or cancels.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace};

/// Error returned by [`PauseGate::checkpoint`] when the gate was cancelled.
///
/// Cancellation is terminal for a run: a worker receiving this must stop
/// iterating and return, leaving its partial results intact. It implements
/// `std::error::Error` so it flows through `anyhow` with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker interrupted while checkpointing")
    }
}

impl std::error::Error for Interrupted {}

#[derive(Debug, Default)]
struct GateState {
    paused: bool,
    cancelled: bool,
}

/// Thread-safe pause latch with a wait/notify protocol.
///
/// Created once per run by the coordinator and shared by `Arc` with every
/// worker. The flag is only ever read or written under the mutex; waiters
/// re-check it after every wake, so spurious wakeups and resume/pause races
/// cannot let a paused worker slip through.
#[derive(Debug, Default)]
pub struct PauseGate {
    state: Mutex<GateState>,
    resumed: Condvar,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned mutex means a worker panicked mid-checkpoint. The state is
    // a pair of bools with no invariant between them, so recover it rather
    // than cascading the panic into every other worker.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Pause every worker at its next checkpoint. Idempotent, non-blocking.
    pub fn pause(&self) {
        let mut state = self.lock();
        if !state.paused {
            debug!("gate paused");
        }
        state.paused = true;
    }

    /// Clear the pause flag and wake every blocked worker. Idempotent.
    pub fn resume(&self) {
        let mut state = self.lock();
        if state.paused {
            debug!("gate resumed");
        }
        state.paused = false;
        self.resumed.notify_all();
    }

    /// Cancel the run: blocked and future checkpoints return [`Interrupted`].
    pub fn cancel(&self) {
        let mut state = self.lock();
        debug!("gate cancelled");
        state.cancelled = true;
        self.resumed.notify_all();
    }

    /// Worker-side pause point.
    ///
    /// Returns immediately while the gate is open; blocks while it is
    /// paused, releasing the lock for the duration of the wait. The flag is
    /// re-validated after every wake, so a `resume()` followed by an
    /// immediate `pause()` keeps the worker blocked instead of letting it
    /// run through a paused gate.
    pub fn checkpoint(&self) -> Result<(), Interrupted> {
        let mut state = self.lock();
        if state.paused && !state.cancelled {
            trace!("worker blocked at checkpoint");
        }
        while state.paused {
            if state.cancelled {
                return Err(Interrupted);
            }
            state = self
                .resumed
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
        if state.cancelled {
            return Err(Interrupted);
        }
        Ok(())
    }

    /// Snapshot of the pause flag, taken under the lock.
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }
}
