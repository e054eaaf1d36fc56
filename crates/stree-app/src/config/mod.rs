//! Configuration file parsing for the sentiment tree
//!
//! Supports:
//! - `.stree/config.toml` - Grid shape, campaign timing and score encoding

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, save_settings};
pub use types::*;
