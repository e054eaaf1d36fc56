//! Sentiment Tree - ranked sentiment leaves on a tree-shaped grid
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use stree_app::config::init_config_dir;

/// Sentiment Tree - ranked sentiment leaves on a tree-shaped grid
#[derive(Parser, Debug)]
#[command(name = "stree")]
#[command(about = "Place scored text as leaves on a tree and re-sort them", long_about = None)]
struct Args {
    /// Directory holding .stree/config.toml
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Write a default .stree/config.toml and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let base_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if args.init {
        init_config_dir(&base_path)?;
        eprintln!(
            "Config written to {}",
            base_path.join(".stree").join("config.toml").display()
        );
        return Ok(());
    }

    sentiment_tree::run_headless(&base_path).await?;
    Ok(())
}
