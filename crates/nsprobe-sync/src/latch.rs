//! ---
//! nsp_section: "02-synchronisation"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Completion primitives shared by probes and setup."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! One-shot completion latch.
//!
//! A [`CompletionLatch`] starts pending and transitions to signaled exactly
//! once. Every write performed before [`CompletionLatch::signal`] is visible to
//! a thread whose wait returned `Ok`, because both sides hand off through the
//! same mutex.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LatchError {
    #[error("wait interrupted before the latch was signaled")]
    Interrupted,
    #[error("latch not signaled within {waited:?}")]
    TimedOut { waited: Duration },
}

#[derive(Debug, Default)]
struct LatchState {
    done: bool,
    interrupted: bool,
}

/// One-shot signal with blocking, bounded and interruptible waits.
#[derive(Debug, Default)]
pub struct CompletionLatch {
    state: Mutex<LatchState>,
    cond: Condvar,
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the latch done and wake every waiter.
    ///
    /// Returns `true` when this call performed the transition; later calls are
    /// no-ops and return `false`.
    pub fn signal(&self) -> bool {
        let mut state = self.state.lock();
        if state.done {
            return false;
        }
        state.done = true;
        drop(state);
        self.cond.notify_all();
        trace!("completion latch signaled");
        true
    }

    /// Wake every waiter with [`LatchError::Interrupted`].
    ///
    /// Interruption is sticky: waits started afterwards fail immediately. It has
    /// no effect once the latch has been signaled.
    pub fn interrupt(&self) {
        let mut state = self.state.lock();
        if state.done || state.interrupted {
            return;
        }
        state.interrupted = true;
        drop(state);
        self.cond.notify_all();
        trace!("completion latch interrupted");
    }

    pub fn is_signaled(&self) -> bool {
        self.state.lock().done
    }

    /// Block until the latch is signaled. Returns at once if it already was.
    pub fn wait(&self) -> Result<(), LatchError> {
        let mut state = self.state.lock();
        loop {
            if state.done {
                return Ok(());
            }
            if state.interrupted {
                return Err(LatchError::Interrupted);
            }
            self.cond.wait(&mut state);
        }
    }

    /// Block until the latch is signaled or `timeout` elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<(), LatchError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        loop {
            if state.done {
                return Ok(());
            }
            if state.interrupted {
                return Err(LatchError::Interrupted);
            }
            match deadline {
                Some(deadline) => {
                    if self.cond.wait_until(&mut state, deadline).timed_out() {
                        if state.done {
                            return Ok(());
                        }
                        return Err(LatchError::TimedOut { waited: timeout });
                    }
                }
                // Deadline overflowed `Instant`; treat as unbounded.
                None => self.cond.wait(&mut state),
            }
        }
    }
}
