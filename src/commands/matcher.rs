//! Fuzzy command matching
//!
//! A query is compared against each keyword cut down to the query's length,
//! so a correctly typed prefix scores as an exact match. Candidates are then
//! filtered by what the current session state allows.

use tracing::debug;

use super::registry::{CommandDescriptor, COMMANDS};
use crate::state::{CommandContext, Phase};

/// Default maximum edit distance for a match
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Whether `keyword` may be invoked in `context`
pub fn is_legal(keyword: &str, context: CommandContext) -> bool {
    if keyword == "help" {
        return true;
    }
    if context.phase == Phase::Init {
        return keyword == "start";
    }
    if context.paused {
        keyword != "pause"
    } else {
        keyword != "start"
    }
}

/// Score of one candidate against a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Score {
    exact_prefix: bool,
    distance: usize,
}

/// Ranks registered commands against free-text queries
#[derive(Debug, Clone)]
pub struct Matcher {
    commands: &'static [CommandDescriptor],
    max_distance: usize,
}

impl Matcher {
    pub fn new(max_distance: usize) -> Self {
        Self {
            commands: &COMMANDS,
            max_distance,
        }
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Commands matching `query` that are legal in `context`, best first
    pub fn rank(&self, query: &str, context: CommandContext) -> Vec<&'static CommandDescriptor> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(Score, &'static CommandDescriptor)> = self
            .commands
            .iter()
            .filter_map(|command| {
                let score = self.score(&query, command.keyword)?;
                debug!("'{}' matches '{}': {:?}", query, command.keyword, score);
                Some((score, command))
            })
            .filter(|(_, command)| is_legal(command.keyword, context))
            .collect();

        // sort_by_key is stable, so ties keep registry order
        scored.sort_by_key(|(score, _)| (!score.exact_prefix, score.distance));
        scored.into_iter().map(|(_, command)| command).collect()
    }

    /// Score `keyword` against a lowercased, non-empty query.
    ///
    /// A candidate must be within `max_distance` edits and keep at least one
    /// character of the compared prefix intact.
    fn score(&self, query: &str, keyword: &str) -> Option<Score> {
        let keyword = keyword.to_lowercase();
        let prefix_len = query.chars().count().min(keyword.chars().count());
        let keyword_prefix: String = keyword.chars().take(prefix_len).collect();
        let query_prefix: String = query.chars().take(prefix_len).collect();

        let distance = strsim::levenshtein(query, &keyword_prefix);
        // effective limit is min(max_distance, prefix_len - 1) for short queries
        if distance > self.max_distance || distance >= prefix_len {
            return None;
        }

        Some(Score {
            exact_prefix: query_prefix == keyword_prefix,
            distance,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE)
    }
}
