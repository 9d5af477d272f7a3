//! Command registry and query matching
//!
//! The registry is a fixed table of keyword/display/action records. The
//! matcher turns free text plus the engine's context into a ranked list of
//! commands that may be invoked right now.

pub mod matcher;
pub mod registry;

// Re-export main types
pub use matcher::{is_legal, Matcher};
pub use registry::{CommandDescriptor, COMMANDS};
