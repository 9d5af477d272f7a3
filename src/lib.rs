//! Pomodoro Daemon - A work/break interval timer behind a launcher query boundary
//! 
//! The engine cycles a session through work and break phases, tracking time
//! across pause and resume. Free-text queries are fuzzy-matched against a
//! fixed command set, filtered by what the current state allows.

pub mod api;
pub mod commands;
pub mod config;
pub mod notify;
pub mod state;
pub mod status;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use commands::{CommandDescriptor, Matcher};
pub use config::Config;
pub use notify::{Notification, Notifier};
pub use state::{AppState, Engine, Phase};
pub use utils::signals::shutdown_signal;
