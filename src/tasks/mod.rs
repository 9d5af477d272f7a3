//! Background tasks module
//! 
//! This module contains the phase expiry timer and the tasks that run
//! alongside the HTTP server.

pub mod notification_log;
pub mod phase_timer;

// Re-export main items
pub use notification_log::notification_log_task;
pub use phase_timer::{PhaseTimer, TimerToken};
