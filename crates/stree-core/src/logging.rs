//! File logging for the sentiment tree
//!
//! stdout carries the headless event stream, so logs always go to a
//! daily-rolling file under the platform data directory.

use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_FILE_PREFIX: &str = "stree.log";
const LOG_ENV_VAR: &str = "STREE_LOG";
const DEFAULT_FILTER: &str = "sentiment_tree=info,stree_app=info,stree_core=info,warn";

/// Install the global subscriber and return the directory logs are written to.
///
/// The filter comes from `STREE_LOG` when it is set and valid, e.g.
/// `STREE_LOG=stree_app=trace stree`.
pub fn init() -> Result<PathBuf> {
    let log_dir = log_directory(dirs::data_local_dir().as_deref());
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("Logging to {}", log_dir.display());
    Ok(log_dir)
}

/// `<data dir>/sentiment-tree/logs`, relative to the working directory when
/// the platform has no data directory
fn log_directory(data_dir: Option<&Path>) -> PathBuf {
    data_dir
        .unwrap_or_else(|| Path::new("."))
        .join("sentiment-tree")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_under_data_dir() {
        let dir = log_directory(Some(Path::new("/home/u/.local/share")));
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/sentiment-tree/logs"));
    }

    #[test]
    fn test_log_directory_without_data_dir() {
        assert_eq!(log_directory(None), PathBuf::from("./sentiment-tree/logs"));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
