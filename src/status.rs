//! Status projection for the `status` command

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::state::{Phase, Session};

/// Display-ready view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub phase: Phase,
    /// Active time in the phase, `MM:SS`
    pub elapsed: String,
    /// Phase length, `MM:SS`
    pub total: String,
    pub paused: bool,
    /// Elapsed share of the phase, clamped to `0.0..=1.0`
    pub progress: f64,
}

/// Project a session into a status snapshot at `now`
pub fn project(session: &Session, now: Instant) -> StatusSnapshot {
    let elapsed = session.elapsed(now);
    let total = session.phase_duration();

    let progress = if total.is_zero() {
        0.0
    } else {
        (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    };

    StatusSnapshot {
        phase: session.phase,
        elapsed: format_mm_ss(elapsed),
        total: format_mm_ss(total),
        paused: session.paused,
        progress,
    }
}

/// Format a duration as zero-padded `MM:SS`. Minutes keep counting past 59.
pub fn format_mm_ss(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
