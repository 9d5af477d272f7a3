//! Configuration and CLI argument handling

use clap::Parser;

use crate::{
    commands::matcher::DEFAULT_MAX_DISTANCE,
    state::{session::MAX_PHASE_MINUTES, PhaseDurations},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-daemon")]
#[command(about = "A work/break interval timer driven by fuzzy-matched launcher queries")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work phase duration in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..=MAX_PHASE_MINUTES))]
    pub work: u64,

    /// Break phase duration in minutes
    #[arg(short = 'b', long = "break", default_value = "5", value_parser = clap::value_parser!(u64).range(1..=MAX_PHASE_MINUTES))]
    pub break_minutes: u64,

    /// Maximum edit distance between a query and a command keyword
    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE)]
    pub max_distance: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Configured phase lengths
    pub fn durations(&self) -> PhaseDurations {
        PhaseDurations::from_minutes(self.work, self.break_minutes)
    }
}
