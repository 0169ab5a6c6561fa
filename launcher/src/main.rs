//! Minigames - headless launcher
//!
//! # Usage
//!
//! ```bash
//! minigames                          # menu on stdin
//! minigames --list
//! minigames --game pong --players 2 --difficulty hard
//! minigames --game pong --sessions 3 --fixed-frame-ms 16 --seed 42
//! minigames --bundle bundles/
//! ```
//!
//! Log level follows `RUST_LOG` (default: info).

use clap::Parser;
use minigame_launcher::Args;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match minigame_launcher::run(&args) {
        Ok(reports) => tracing::info!("Played {} session(s)", reports.len()),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
