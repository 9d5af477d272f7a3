//! One-shot phase expiry timer
//!
//! At most one expiry is ever pending. Arming replaces the previous expiry
//! and hands out a fresh token; the engine ignores any firing whose token is
//! no longer current, so an expiry that loses the race against `cancel` can
//! never act on a state it was not armed for.

use std::{
    sync::Weak,
    time::Duration,
};
use tokio::{runtime::Handle, task::JoinHandle, time::sleep};
use tracing::debug;

use crate::state::Engine;

/// Identifies one arming of the phase timer
pub type TimerToken = u64;

/// Owner of the single pending phase expiry
#[derive(Debug)]
pub struct PhaseTimer {
    runtime: Handle,
    pending: Option<(TimerToken, JoinHandle<()>)>,
    last_token: TimerToken,
}

impl PhaseTimer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: None,
            last_token: 0,
        }
    }

    /// Schedule an expiry after `delay`, replacing any pending one
    pub fn arm(&mut self, delay: Duration, engine: Weak<Engine>) -> TimerToken {
        self.cancel();

        self.last_token += 1;
        let token = self.last_token;
        debug!("Arming phase timer #{} for {}s", token, delay.as_secs());

        let handle = self.runtime.spawn(async move {
            sleep(delay).await;
            if let Some(engine) = engine.upgrade() {
                engine.on_phase_expired(token);
            }
        });
        self.pending = Some((token, handle));
        token
    }

    /// Drop the pending expiry, if any
    pub fn cancel(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            debug!("Cancelling phase timer #{}", token);
            handle.abort();
        }
    }

    /// Claim a firing. Returns true only for the currently armed token and
    /// clears it, so the task finishing the expiry is not aborted by a re-arm.
    pub fn take_if_current(&mut self, token: TimerToken) -> bool {
        match &self.pending {
            Some((current, _)) if *current == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Whether an expiry is pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
