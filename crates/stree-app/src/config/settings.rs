//! Settings parser for .stree/config.toml

use super::types::Settings;
use std::path::Path;
use stree_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const STREE_DIR: &str = ".stree";

const DEFAULT_CONFIG: &str = r#"# Sentiment Tree Configuration

[grid]
rows = 14
columns = 7
trunk_column = 3
# One string per row: "." no slot, "L" leaf slot, "T" trunk slot.
# Leave empty to make every non-trunk cell a leaf slot.
canopy = [
    "...T...",
    "..LTL..",
    "..LTL..",
    ".L.T.L.",
    ".LLTLL.",
    "..LTL..",
    ".L.T.L.",
    "L.LTL.L",
    "LLLTLLL",
    ".LLTLL.",
    "...T...",
    "...T...",
    "...T...",
    "...T...",
]

[timing]
lead_ms = 100        # Added to every scheduled step
trunk_step_ms = 200  # Trunk growth cadence
sort_step_ms = 100   # Re-sort placement cadence

[scoring.score_multiplier]
negative = 10.0
neutral = 100.0
positive = 1000.0

[scoring.stats_multiplier]
negative = 10.0
neutral = 1.0
positive = 0.1
"#;

/// Load settings from `.stree/config.toml`, falling back to defaults
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(STREE_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a default config file in the .stree/ directory
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let stree_dir = project_path.join(STREE_DIR);

    if !stree_dir.exists() {
        std::fs::create_dir_all(&stree_dir)
            .map_err(|e| Error::config(format!("Failed to create .stree dir: {}", e)))?;
        info!("Created .stree directory");
    }

    let config_path = stree_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config.toml");
    }

    Ok(())
}

/// Save settings to `.stree/config.toml`
pub fn save_settings(project_path: &Path, settings: &Settings) -> Result<()> {
    let stree_dir = project_path.join(STREE_DIR);

    if !stree_dir.exists() {
        std::fs::create_dir_all(&stree_dir)
            .map_err(|e| Error::config(format!("Failed to create .stree dir: {}", e)))?;
    }

    let config_path = stree_dir.join(CONFIG_FILENAME);
    let temp_path = stree_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("# Sentiment Tree Configuration\n\n{}", content);

    // Atomic write: write to temp, then rename
    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    std::fs::rename(&temp_path, &config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}
