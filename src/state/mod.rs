//! State management module
//! 
//! This module contains the session state machine, the engine that owns it
//! and the shared state handed to HTTP handlers.

pub mod app_state;
pub mod engine;
pub mod phase;
pub mod session;

// Re-export main types
pub use app_state::AppState;
pub use engine::{CommandContext, Engine};
pub use phase::Phase;
pub use session::{PhaseDurations, Session};
