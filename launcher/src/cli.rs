//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use minigame_core::{AiDifficulty, Config, MAX_PLAYERS};

#[derive(Debug, Clone, Parser)]
#[command(name = "minigames")]
#[command(author, version, about = "Minigame collection - headless session launcher")]
pub struct Args {
    /// Skip the menu and play this minigame every session
    #[arg(long, short = 'g', value_name = "ID")]
    pub game: Option<String>,

    /// Number of human players (1-4); the remaining slots are AI
    #[arg(long, short = 'p', value_parser = clap::value_parser!(u32).range(1..=MAX_PLAYERS as i64))]
    pub players: Option<u32>,

    /// AI difficulty (easy, medium, hard)
    #[arg(long, short = 'd')]
    pub difficulty: Option<AiDifficulty>,

    /// Config file to use instead of the platform config directory
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Load minigames from a directory of manifests instead of the built-in list
    #[arg(long, value_name = "DIR")]
    pub bundle: Option<PathBuf>,

    /// Print the available minigames and exit
    #[arg(long)]
    pub list: bool,

    /// Stop after this many sessions (default: until the menu quits)
    #[arg(long, value_name = "N")]
    pub sessions: Option<u32>,

    /// RNG seed (default: from entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    // === Headless pacing ===
    /// Feed every frame this many milliseconds instead of pacing to the clock
    #[arg(long, value_name = "MS")]
    pub fixed_frame_ms: Option<u64>,
}

impl Args {
    /// Layer the command line on top of the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(players) = self.players {
            config.session.player_count = players;
        }
        if let Some(difficulty) = self.difficulty {
            config.session.ai_difficulty = difficulty;
        }
        if let Some(game) = &self.game {
            config.debug.skip_menu = true;
            config.debug.minigame_to_test = game.clone();
        }
        if self.seed.is_some() {
            config.debug.seed = self.seed;
        }
    }
}
