//! Notification payloads and sinks
//!
//! The engine never renders anything itself. It hands every user-facing
//! event to a [`Notifier`] supplied at construction.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::status::StatusSnapshot;

/// A payload for the external notification surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Transient event text ("Session started!", "Skipped to break!", ...)
    Message { text: String },
    /// Structured progress for the `status` command
    Status(StatusSnapshot),
}

impl Notification {
    pub fn message(text: impl Into<String>) -> Self {
        Notification::Message { text: text.into() }
    }

    /// Message text, if this is a plain message
    pub fn text(&self) -> Option<&str> {
        match self {
            Notification::Message { text } => Some(text),
            Notification::Status(_) => None,
        }
    }
}

/// Capability to deliver notifications somewhere visible
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::Message { text } => info!("{}", text),
            Notification::Status(status) => info!(
                "{}{} {} / {}",
                if status.paused { "PAUSED " } else { "" },
                status.phase.title(),
                status.elapsed,
                status.total
            ),
        }
    }
}

/// Fans notifications out over a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: &Notification) {
        if let Err(e) = self.tx.send(notification.clone()) {
            warn!("No notification subscribers: {}", e);
        }
    }
}

/// Keeps every notification in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    /// Text of the most recent plain message
    pub fn last_message(&self) -> Option<String> {
        self.notifications()
            .iter()
            .rev()
            .find_map(|n| n.text().map(str::to_string))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification.clone());
        }
    }
}
