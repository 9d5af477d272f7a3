//! Shared application state for the query boundary

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::Engine;
use crate::{
    commands::{is_legal, registry, CommandDescriptor, Matcher},
    notify::Notification,
};

/// Why a command could not be invoked through the query boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// No command has this keyword
    Unknown(String),
    /// The command exists but is not selectable in the current state
    NotAllowed(&'static str),
}

/// State shared by all HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// The interval timer engine
    pub engine: Arc<Engine>,
    /// Query matcher
    pub matcher: Matcher,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last invoked command
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, matcher: Matcher, port: u16, host: String) -> Self {
        Self {
            engine,
            matcher,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Rank commands for a search string against the engine's current context
    pub fn query(&self, search: &str) -> Vec<&'static CommandDescriptor> {
        let context = self.engine.context();
        let results = self.matcher.rank(search, context);
        info!("Query '{}' in {:?} matched {} command(s)", search, context, results.len());
        results
    }

    /// Invoke one command by keyword, if it is legal right now
    pub fn invoke(&self, keyword: &str) -> Result<Notification, InvokeError> {
        let command = registry::find(keyword)
            .ok_or_else(|| InvokeError::Unknown(keyword.to_string()))?;

        let context = self.engine.context();
        if !is_legal(command.keyword, context) {
            warn!("Command '{}' is not allowed in {:?}", command.keyword, context);
            return Err(InvokeError::NotAllowed(command.keyword));
        }

        let notification = command.invoke(&self.engine);
        self.record_action(command.keyword);
        Ok(notification)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
