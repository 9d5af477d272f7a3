//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    commands::CommandDescriptor,
    notify::Notification,
    state::Phase,
    status::StatusSnapshot,
};

/// One selectable result of a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Keyword to pass to `POST /commands/{keyword}`
    pub keyword: String,
    pub title: String,
    pub subtitle: String,
}

impl From<&CommandDescriptor> for QueryResult {
    fn from(command: &CommandDescriptor) -> Self {
        Self {
            keyword: command.keyword.to_string(),
            title: command.title.to_string(),
            subtitle: command.subtitle.to_string(),
        }
    }
}

/// Ranked results for a search string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub results: Vec<QueryResult>,
}

/// Response to a command invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub command: String,
    pub notification: Option<Notification>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CommandResponse {
    /// A command that ran and emitted `notification`
    pub fn ok(command: &str, notification: Notification) -> Self {
        Self {
            status: "ok".to_string(),
            command: command.to_string(),
            notification: Some(notification),
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// A command that could not run
    pub fn error(command: &str, message: String) -> Self {
        Self {
            status: "error".to_string(),
            command: command.to_string(),
            notification: None,
            message: Some(message),
            timestamp: Utc::now(),
        }
    }
}

/// Full session status with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: Phase,
    pub running: bool,
    pub paused: bool,
    /// Signed; may briefly be negative while a phase expiry is firing
    pub time_left_seconds: i64,
    pub work_minutes: u64,
    pub break_minutes: u64,
    pub status: Option<StatusSnapshot>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Body of `PUT /durations/{phase}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub minutes: u64,
}

/// Result of a duration change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationResponse {
    pub phase: Phase,
    pub minutes: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
