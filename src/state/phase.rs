//! Session phases and the fixed transition table

use std::fmt;

use serde::{Deserialize, Serialize};

/// The timer's current mode. `Init` is the only phase without a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Init,
    Work,
    Break,
}

/// Transition table: each phase maps to the phase that follows it.
const NEXT_PHASE: [(Phase, Phase); 3] = [
    (Phase::Init, Phase::Work),
    (Phase::Work, Phase::Break),
    (Phase::Break, Phase::Work),
];

impl Phase {
    /// Look up the phase entered when this one ends or is skipped
    pub fn next(self) -> Phase {
        NEXT_PHASE
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(Phase::Work)
    }

    /// Whether this phase runs a countdown
    pub fn is_timed(self) -> bool {
        self != Phase::Init
    }

    /// Lowercase name, as used in messages and URLs
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    /// Capitalized name for notification headlines
    pub fn title(self) -> &'static str {
        match self {
            Phase::Init => "Init",
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }

    /// Parse a configurable phase name. `init` is not configurable and yields `None`.
    pub fn from_config_key(key: &str) -> Option<Phase> {
        match key.to_ascii_lowercase().as_str() {
            "work" => Some(Phase::Work),
            "break" => Some(Phase::Break),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
