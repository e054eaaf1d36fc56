//! Sentiment Tree Library
//!
//! Headless runner for the sentiment tree engine.

pub mod headless;

// Re-export main entry points
pub use headless::runner::{parse_command, run_headless};
