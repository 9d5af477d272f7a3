//! Phase/timer engine
//!
//! The engine is the single owner of the session. Command dispatch and the
//! phase expiry task both go through the same mutex, and the expiry timer is
//! armed and cancelled inside that critical section.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use tokio::{runtime::Handle, time::Instant};
use tracing::{debug, info, warn};

use super::{
    session::{minutes_to_duration, MAX_PHASE_MINUTES},
    Phase, PhaseDurations, Session,
};
use crate::{
    commands::registry::COMMANDS,
    notify::{Notification, Notifier},
    status::{self, StatusSnapshot},
    tasks::phase_timer::{PhaseTimer, TimerToken},
};

pub const MSG_STARTED: &str = "⏱ Session started!";
pub const MSG_RESUMED: &str = "⚙ Session resumed!";
pub const MSG_ALREADY_RUNNING: &str = "⛔ Session already in progress!";
pub const MSG_STOPPED: &str = "⏱ Session stopped!";
pub const MSG_NO_SESSION: &str = "No session in progress!";
pub const MSG_PAUSED: &str = "⏱ Session paused!";
pub const MSG_ALREADY_PAUSED: &str = "Session already paused!";
pub const MSG_STATUS_IDLE: &str = "No session in progress!\nRun 'start' to start a new session.";

/// Message announcing a manual skip into `phase`
pub fn skipped_message(phase: Phase) -> String {
    format!("\u{1F3C3}\u{200D}\u{2642}\u{FE0F} Skipped to {}!", phase.as_str())
}

/// Message announcing an automatic transition into `phase`
pub fn phase_start_message(phase: Phase) -> String {
    let icon = if phase == Phase::Work { "⚙" } else { "☕" };
    format!("{} {} start!", icon, phase.title())
}

/// Phase and pause flag, the context command legality depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub phase: Phase,
    pub paused: bool,
}

struct EngineInner {
    session: Session,
    timer: PhaseTimer,
}

/// Interval timer engine
pub struct Engine {
    inner: Mutex<EngineInner>,
    notifier: Arc<dyn Notifier>,
    self_ref: Weak<Engine>,
}

impl Engine {
    /// Create an idle engine. Must be called from within a Tokio runtime,
    /// which is where phase expiries will be scheduled.
    pub fn new(durations: PhaseDurations, notifier: Arc<dyn Notifier>) -> Result<Arc<Self>, String> {
        let runtime = Handle::try_current()
            .map_err(|e| format!("Engine requires a Tokio runtime: {}", e))?;
        Ok(Self::with_runtime(durations, notifier, runtime))
    }

    /// Create an idle engine scheduling its expiries on `runtime`
    pub fn with_runtime(
        durations: PhaseDurations,
        notifier: Arc<dyn Notifier>,
        runtime: Handle,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            inner: Mutex::new(EngineInner {
                session: Session::new(durations, Instant::now()),
                timer: PhaseTimer::new(runtime),
            }),
            notifier,
            self_ref: self_ref.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        // Session updates never panic midway, so a poisoned guard is still consistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` under the lock, then deliver its notification outside it
    fn dispatch<F>(&self, f: F) -> Notification
    where
        F: FnOnce(&mut EngineInner, &Weak<Engine>) -> Notification,
    {
        let mut inner = self.lock();
        let notification = f(&mut inner, &self.self_ref);
        drop(inner);

        self.notifier.notify(&notification);
        notification
    }

    /// Start a session from `Init`, or resume a paused one
    pub fn start_session(&self) -> Notification {
        self.dispatch(|inner, engine| {
            let now = Instant::now();
            let session = &mut inner.session;

            if session.phase == Phase::Init {
                session.enter(Phase::Work, now);
                inner.timer.arm(session.phase_duration(), engine.clone());
                info!("Session started, work for {}s", session.phase_duration().as_secs());
                Notification::message(MSG_STARTED)
            } else if session.resume(now) {
                let remaining = session.remaining(now);
                inner.timer.arm(remaining, engine.clone());
                info!("Session resumed, {}s left in {}", remaining.as_secs(), session.phase);
                Notification::message(MSG_RESUMED)
            } else {
                debug!("Start ignored, session already running");
                Notification::message(MSG_ALREADY_RUNNING)
            }
        })
    }

    /// End the session and return to `Init`
    pub fn stop_session(&self) -> Notification {
        self.dispatch(|inner, _| {
            if inner.session.phase == Phase::Init {
                debug!("Stop ignored, no session");
                return Notification::message(MSG_NO_SESSION);
            }
            inner.timer.cancel();
            inner.session.reset(Instant::now());
            info!("Session stopped");
            Notification::message(MSG_STOPPED)
        })
    }

    /// Jump to the next phase with its full duration
    pub fn skip_phase(&self) -> Notification {
        self.dispatch(|inner, engine| {
            if inner.session.phase == Phase::Init {
                debug!("Skip ignored, no session");
                return Notification::message(MSG_NO_SESSION);
            }
            let next = inner.session.advance(Instant::now());
            inner.timer.arm(inner.session.phase_duration(), engine.clone());
            info!("Skipped to {}", next);
            Notification::message(skipped_message(next))
        })
    }

    /// Suspend the countdown. Repeated pauses are no-ops.
    pub fn pause_session(&self) -> Notification {
        self.dispatch(|inner, _| {
            let session = &mut inner.session;
            if session.pause(Instant::now()) {
                inner.timer.cancel();
                info!(
                    "Session paused with {}s elapsed in {}",
                    session.elapsed_in_phase.as_secs(),
                    session.phase
                );
                return Notification::message(MSG_PAUSED);
            }

            warn!("Pause ignored in phase {} (paused={})", session.phase, session.paused);
            if session.phase == Phase::Init {
                Notification::message(MSG_NO_SESSION)
            } else {
                Notification::message(MSG_ALREADY_PAUSED)
            }
        })
    }

    /// Emit a status payload for the running session
    pub fn show_status(&self) -> Notification {
        self.dispatch(|inner, _| {
            if inner.session.phase == Phase::Init {
                return Notification::message(MSG_STATUS_IDLE);
            }
            Notification::Status(status::project(&inner.session, Instant::now()))
        })
    }

    /// Emit a message describing every available command
    pub fn show_help(&self) -> Notification {
        self.dispatch(|_, _| {
            let lines: Vec<String> = COMMANDS
                .iter()
                .map(|command| format!("{:<7} {}", command.keyword, command.subtitle))
                .collect();
            Notification::message(format!("Available commands:\n{}", lines.join("\n")))
        })
    }

    /// Change the length of a timed phase. A pending expiry keeps its
    /// original deadline. Returns false for `Init` or a length outside
    /// `1..=MAX_PHASE_MINUTES`.
    pub fn set_phase_duration(&self, phase: Phase, minutes: u64) -> bool {
        let Some(duration) = minutes_to_duration(minutes) else {
            warn!(
                "Ignoring {}-minute duration for {}, must be 1..={}",
                minutes, phase, MAX_PHASE_MINUTES
            );
            return false;
        };
        let mut inner = self.lock();
        let updated = inner.session.durations.set(phase, duration);
        if updated {
            info!("{} duration set to {} minutes", phase.title(), minutes);
        } else {
            warn!("Phase {} has no configurable duration", phase);
        }
        updated
    }

    /// Time left in the current phase. May dip below zero while an expiry is firing.
    pub fn time_left_in_phase(&self) -> chrono::Duration {
        self.lock().session.time_left(Instant::now())
    }

    /// Active time spent in the current phase
    pub fn elapsed_in_phase(&self) -> Duration {
        self.lock().session.elapsed(Instant::now())
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.lock().session.phase
    }

    /// Whether a session has been started and not stopped
    pub fn is_running(&self) -> bool {
        self.lock().session.running
    }

    /// Whether the countdown is suspended
    pub fn is_paused(&self) -> bool {
        self.lock().session.paused
    }

    /// Phase and pause flag read together
    pub fn context(&self) -> CommandContext {
        let inner = self.lock();
        CommandContext {
            phase: inner.session.phase,
            paused: inner.session.paused,
        }
    }

    /// Consistent copy of the session
    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    /// Status snapshot, `None` when no session is in progress
    pub fn status(&self) -> Option<StatusSnapshot> {
        let inner = self.lock();
        if inner.session.phase == Phase::Init {
            return None;
        }
        Some(status::project(&inner.session, Instant::now()))
    }

    /// Whether a phase expiry is pending
    pub fn has_pending_expiry(&self) -> bool {
        self.lock().timer.is_armed()
    }

    /// Expiry callback. Stale tokens (from a timer that was replaced or
    /// cancelled after it started firing) are ignored.
    pub(crate) fn on_phase_expired(&self, token: TimerToken) {
        let mut inner = self.lock();
        if !inner.timer.take_if_current(token) {
            debug!("Ignoring stale phase timer #{}", token);
            return;
        }

        let next = inner.session.advance(Instant::now());
        let delay = inner.session.phase_duration();
        inner.timer.arm(delay, self.self_ref.clone());
        drop(inner);

        info!("Phase expired, entering {}", next);
        self.notifier.notify(&Notification::message(phase_start_message(next)));
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Engine")
            .field("session", &inner.session)
            .field("expiry_armed", &inner.timer.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use tokio::time::sleep;

    fn engine() -> (Arc<Engine>, Arc<RecordingNotifier>) {
        let recorder = Arc::new(RecordingNotifier::new());
        let engine = Engine::new(PhaseDurations::default(), recorder.clone()).unwrap();
        (engine, recorder)
    }

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    #[tokio::test(start_paused = true)]
    async fn start_from_init_enters_work_with_full_duration() {
        let (engine, recorder) = engine();

        let notification = engine.start_session();
        assert_eq!(notification.text(), Some(MSG_STARTED));
        assert_eq!(engine.phase(), Phase::Work);
        assert!(engine.is_running());
        assert_eq!(engine.time_left_in_phase(), secs(1500));
        assert!(engine.has_pending_expiry());
        assert_eq!(recorder.last_message().as_deref(), Some(MSG_STARTED));
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_changes_nothing() {
        let (engine, _) = engine();
        engine.start_session();
        sleep(Duration::from_secs(30)).await;

        let notification = engine.start_session();
        assert_eq!(notification.text(), Some(MSG_ALREADY_RUNNING));
        assert_eq!(engine.time_left_in_phase(), secs(1470));
    }

    #[tokio::test(start_paused = true)]
    async fn resume_keeps_remaining_time() {
        let (engine, recorder) = engine();
        engine.start_session();
        sleep(Duration::from_secs(10)).await;

        engine.pause_session();
        assert!(!engine.has_pending_expiry());
        sleep(Duration::from_secs(300)).await;
        assert_eq!(engine.time_left_in_phase(), secs(1490));

        engine.start_session();
        assert_eq!(recorder.last_message().as_deref(), Some(MSG_RESUMED));
        assert!(!engine.is_paused());
        assert_eq!(engine.time_left_in_phase(), secs(1490));
    }

    #[tokio::test(start_paused = true)]
    async fn resumed_phase_expires_after_remaining_time_only() {
        let (engine, _) = engine();
        engine.start_session();
        sleep(Duration::from_secs(10)).await;
        engine.pause_session();
        sleep(Duration::from_secs(60)).await;
        engine.start_session();

        sleep(Duration::from_secs(1489)).await;
        assert_eq!(engine.phase(), Phase::Work);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.phase(), Phase::Break);
    }

    #[tokio::test(start_paused = true)]
    async fn double_pause_does_not_double_count() {
        let (engine, recorder) = engine();
        engine.start_session();
        sleep(Duration::from_secs(10)).await;
        engine.pause_session();
        sleep(Duration::from_secs(20)).await;

        let notification = engine.pause_session();
        assert_eq!(notification.text(), Some(MSG_ALREADY_PAUSED));
        assert_eq!(engine.elapsed_in_phase(), Duration::from_secs(10));
        assert_eq!(recorder.notifications().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_in_init_is_a_no_op() {
        let (engine, _) = engine();
        let notification = engine.pause_session();
        assert_eq!(notification.text(), Some(MSG_NO_SESSION));
        assert_eq!(engine.phase(), Phase::Init);
        assert!(!engine.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_to_init_and_cancels_expiry() {
        let (engine, _) = engine();
        engine.start_session();

        assert_eq!(engine.stop_session().text(), Some(MSG_STOPPED));
        assert_eq!(engine.phase(), Phase::Init);
        assert!(!engine.is_running());
        assert!(!engine.has_pending_expiry());

        sleep(Duration::from_secs(3600)).await;
        assert_eq!(engine.phase(), Phase::Init);
        assert_eq!(engine.stop_session().text(), Some(MSG_NO_SESSION));
    }

    #[tokio::test(start_paused = true)]
    async fn skip_arms_full_duration_of_next_phase() {
        let (engine, _) = engine();
        engine.start_session();
        sleep(Duration::from_secs(100)).await;
        engine.pause_session();

        let notification = engine.skip_phase();
        assert_eq!(
            notification.text(),
            Some("\u{1F3C3}\u{200D}\u{2642}\u{FE0F} Skipped to break!")
        );
        assert_eq!(engine.phase(), Phase::Break);
        assert!(!engine.is_paused());
        assert_eq!(engine.time_left_in_phase(), secs(300));
        assert!(engine.has_pending_expiry());

        engine.skip_phase();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.time_left_in_phase(), secs(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn skip_without_session_is_a_no_op() {
        let (engine, _) = engine();
        assert_eq!(engine.skip_phase().text(), Some(MSG_NO_SESSION));
        assert_eq!(engine.phase(), Phase::Init);
        assert!(!engine.has_pending_expiry());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_moves_to_break_and_rearms() {
        let (engine, recorder) = engine();
        engine.start_session();

        sleep(Duration::from_secs(1501)).await;
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.time_left_in_phase(), secs(299));
        assert!(engine.has_pending_expiry());
        assert_eq!(recorder.last_message().as_deref(), Some("☕ Break start!"));

        sleep(Duration::from_secs(300)).await;
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(recorder.last_message().as_deref(), Some("⚙ Work start!"));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_session_never_expires() {
        let (engine, _) = engine();
        engine.start_session();
        sleep(Duration::from_secs(10)).await;
        engine.pause_session();

        sleep(Duration::from_secs(5000)).await;
        assert_eq!(engine.phase(), Phase::Work);
        assert!(engine.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_token_is_ignored() {
        let (engine, _) = engine();
        engine.start_session();
        engine.skip_phase();

        // the first arming was replaced by the skip
        engine.on_phase_expired(1);
        assert_eq!(engine.phase(), Phase::Break);
        assert!(engine.has_pending_expiry());
    }

    #[tokio::test(start_paused = true)]
    async fn duration_changes_apply_to_future_phases() {
        let (engine, _) = engine();
        assert!(engine.set_phase_duration(Phase::Break, 10));
        assert!(!engine.set_phase_duration(Phase::Init, 10));
        assert!(!engine.set_phase_duration(Phase::Work, 0));

        engine.start_session();
        assert_eq!(engine.time_left_in_phase(), secs(1500));
        engine.skip_phase();
        assert_eq!(engine.time_left_in_phase(), secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_durations_are_rejected() {
        let (engine, _) = engine();
        assert!(!engine.set_phase_duration(Phase::Work, u64::MAX));
        assert!(!engine.set_phase_duration(Phase::Work, 200_000_000_000_000));
        assert!(!engine.set_phase_duration(Phase::Break, MAX_PHASE_MINUTES + 1));
        assert!(engine.set_phase_duration(Phase::Break, MAX_PHASE_MINUTES));

        engine.start_session();
        assert_eq!(engine.time_left_in_phase(), secs(1500));
        engine.skip_phase();
        assert_eq!(engine.time_left_in_phase(), secs(MAX_PHASE_MINUTES as i64 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn status_reports_progress_or_idle() {
        let (engine, _) = engine();
        assert_eq!(
            engine.show_status().text(),
            Some("No session in progress!\nRun 'start' to start a new session.")
        );
        assert!(engine.status().is_none());

        engine.start_session();
        sleep(Duration::from_secs(65)).await;
        engine.pause_session();

        match engine.show_status() {
            Notification::Status(snapshot) => {
                assert_eq!(snapshot.phase, Phase::Work);
                assert_eq!(snapshot.elapsed, "01:05");
                assert_eq!(snapshot.total, "25:00");
                assert!(snapshot.paused);
            }
            other => panic!("expected status payload, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn help_lists_every_command() {
        let (engine, _) = engine();
        let notification = engine.show_help();
        let text = notification.text().unwrap();
        for keyword in ["start", "stop", "pause", "skip", "status", "help"] {
            assert!(text.contains(keyword), "help text missing {keyword}");
        }
    }

    #[test]
    fn construction_outside_runtime_fails() {
        let recorder = Arc::new(RecordingNotifier::new());
        assert!(Engine::new(PhaseDurations::default(), recorder).is_err());
    }
}
