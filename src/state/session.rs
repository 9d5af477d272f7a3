//! Session state and time accounting
//!
//! `Session` is plain data. Every method that depends on the clock takes the
//! current instant as an argument so the accounting can be checked without
//! a running timer.

use std::time::Duration;

use tokio::time::Instant;

use super::Phase;

/// Default work phase length in minutes
pub const DEFAULT_WORK_MINUTES: u64 = 25;
/// Default break phase length in minutes
pub const DEFAULT_BREAK_MINUTES: u64 = 5;
/// Longest configurable phase, one day
pub const MAX_PHASE_MINUTES: u64 = 24 * 60;

/// Convert a phase length in minutes, rejecting zero and anything past
/// [`MAX_PHASE_MINUTES`]
pub fn minutes_to_duration(minutes: u64) -> Option<Duration> {
    if minutes == 0 || minutes > MAX_PHASE_MINUTES {
        return None;
    }
    minutes.checked_mul(60).map(Duration::from_secs)
}

/// Configured lengths of the timed phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub work: Duration,
    /// Break phase length
    pub rest: Duration,
}

impl PhaseDurations {
    /// Build durations from whole minutes, clamped to `1..=MAX_PHASE_MINUTES`
    pub fn from_minutes(work: u64, rest: u64) -> Self {
        let clamp = |minutes: u64| Duration::from_secs(minutes.clamp(1, MAX_PHASE_MINUTES) * 60);
        Self {
            work: clamp(work),
            rest: clamp(rest),
        }
    }

    /// Configured length of a phase. `Init` has no length.
    pub fn get(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::Work => Some(self.work),
            Phase::Break => Some(self.rest),
            Phase::Init => None,
        }
    }

    /// Update the length of a timed phase. Returns false for `Init`.
    pub fn set(&mut self, phase: Phase, duration: Duration) -> bool {
        match phase {
            Phase::Work => self.work = duration,
            Phase::Break => self.rest = duration,
            Phase::Init => return false,
        }
        true
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

/// The engine's state: current phase, pause flag and elapsed time
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: Phase,
    pub running: bool,
    pub paused: bool,
    /// When the phase was entered or last resumed
    pub phase_start: Instant,
    /// Active time banked by pauses since the phase was entered
    pub elapsed_in_phase: Duration,
    pub durations: PhaseDurations,
}

impl Session {
    /// Create an idle session
    pub fn new(durations: PhaseDurations, now: Instant) -> Self {
        Self {
            phase: Phase::Init,
            running: false,
            paused: false,
            phase_start: now,
            elapsed_in_phase: Duration::ZERO,
            durations,
        }
    }

    /// Whether the phase countdown is live (a timer should be pending)
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }

    /// Length of the current phase, zero in `Init`
    pub fn phase_duration(&self) -> Duration {
        self.durations.get(self.phase).unwrap_or(Duration::ZERO)
    }

    /// Active time spent in the current phase
    pub fn elapsed(&self, now: Instant) -> Duration {
        if !self.is_ticking() {
            return self.elapsed_in_phase;
        }
        self.elapsed_in_phase
            .saturating_add(now.saturating_duration_since(self.phase_start))
    }

    /// Remaining time in the current phase. Negative once the phase has overrun.
    pub fn time_left(&self, now: Instant) -> chrono::Duration {
        let millis = |d: Duration| i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
        let total = millis(self.phase_duration());
        let elapsed = millis(self.elapsed(now));
        // both sides are non-negative, so the difference stays within chrono's range
        chrono::Duration::milliseconds(total.saturating_sub(elapsed))
    }

    /// Remaining time as a timer delay, floored at zero
    pub fn remaining(&self, now: Instant) -> Duration {
        self.phase_duration().saturating_sub(self.elapsed(now))
    }

    /// Enter a phase with a fresh countdown
    pub fn enter(&mut self, phase: Phase, now: Instant) {
        self.phase = phase;
        self.running = phase.is_timed();
        self.paused = false;
        self.phase_start = now;
        self.elapsed_in_phase = Duration::ZERO;
    }

    /// Advance along the transition table with a fresh countdown
    pub fn advance(&mut self, now: Instant) -> Phase {
        let next = self.phase.next();
        self.enter(next, now);
        next
    }

    /// Suspend the countdown, banking the running interval.
    ///
    /// Returns false without touching the accounting when there is nothing
    /// to suspend, so a repeated pause can never count the same interval twice.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.is_ticking() {
            return false;
        }
        self.elapsed_in_phase = self
            .elapsed_in_phase
            .saturating_add(now.saturating_duration_since(self.phase_start));
        self.paused = true;
        true
    }

    /// Resume a paused countdown. Returns false if the session is not paused.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.phase_start = now;
        true
    }

    /// Return to `Init`. Configured durations are kept.
    pub fn reset(&mut self, now: Instant) {
        self.phase = Phase::Init;
        self.running = false;
        self.paused = false;
        self.phase_start = now;
        self.elapsed_in_phase = Duration::ZERO;
    }
}
