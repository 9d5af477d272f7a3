//! Notification log background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::notify::{LogNotifier, Notification, Notifier};

/// Background task that writes every broadcast notification to the log
pub async fn notification_log_task(mut rx: broadcast::Receiver<Notification>) {
    info!("Starting notification log task");
    let sink = LogNotifier;

    loop {
        match rx.recv().await {
            Ok(notification) => sink.notify(&notification),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Notification log fell behind, skipped {} notification(s)", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Notification channel closed, stopping log task");
                break;
            }
        }
    }
}
