//! Configuration management (config.toml)
//!
//! Session defaults, loop timing and debug shortcuts. Every section and field
//! is optional in the file; missing values fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::MAX_TICK_RATE;
use crate::state::{AiDifficulty, MAX_PLAYERS};

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Players and AI settings for each session
    #[serde(default)]
    pub session: SessionConfig,
    /// Fixed-timestep loop settings
    #[serde(default)]
    pub timing: TimingConfig,
    /// Development shortcuts
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Settings a fresh `CoreState` is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Human players (default: 4, range: 1-4)
    #[serde(default = "default_player_count")]
    pub player_count: u32,
    /// AI difficulty for non-human slots (default: medium)
    #[serde(default)]
    pub ai_difficulty: AiDifficulty,
    /// Controller port of each logical player (default: [0, 1, 2, 3])
    #[serde(default = "default_controller_ports")]
    pub controller_ports: [u8; MAX_PLAYERS],
}

/// Loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Fixed ticks per second (default: 30)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Longest frame the simulation will catch up on, in ms (default: 250)
    #[serde(default = "default_max_frame_time_ms")]
    pub max_frame_time_ms: u64,
    /// Per-tick time above which a warning is logged, in µs (default: 8333)
    #[serde(default = "default_tick_budget_us")]
    pub tick_budget_us: u64,
    /// Refresh rate a headless display paces itself to (default: 60)
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: u32,
}

/// Development shortcuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DebugConfig {
    /// Skip the menu and always run `minigame_to_test` (default: false)
    #[serde(default)]
    pub skip_menu: bool,
    /// Minigame id used when `skip_menu` is set
    #[serde(default)]
    pub minigame_to_test: String,
    /// Fixed RNG seed instead of entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_player_count() -> u32 {
    MAX_PLAYERS as u32
}
fn default_controller_ports() -> [u8; MAX_PLAYERS] {
    [0, 1, 2, 3]
}
fn default_tick_rate() -> u32 {
    30
}
fn default_max_frame_time_ms() -> u64 {
    250
}
fn default_tick_budget_us() -> u64 {
    8333
}
fn default_refresh_rate() -> u32 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_count: default_player_count(),
            ai_difficulty: AiDifficulty::default(),
            controller_ports: default_controller_ports(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            max_frame_time_ms: default_max_frame_time_ms(),
            tick_budget_us: default_tick_budget_us(),
            refresh_rate: default_refresh_rate(),
        }
    }
}

impl TimingConfig {
    pub fn max_frame_time(&self) -> Duration {
        Duration::from_millis(self.max_frame_time_ms)
    }

    pub fn tick_budget(&self) -> Duration {
        Duration::from_micros(self.tick_budget_us)
    }

    /// Frame period of the headless display.
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate.max(1) as f64)
    }
}

impl Config {
    /// Check value ranges.
    ///
    /// Returns a warning per suspicious value. Out-of-range values are still
    /// usable: the loop clamps them where it has to.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(1..=MAX_PLAYERS as u32).contains(&self.session.player_count) {
            warnings.push(format!(
                "session.player_count {} is outside 1-{}",
                self.session.player_count, MAX_PLAYERS
            ));
        }

        for (player, port) in self.session.controller_ports.iter().enumerate() {
            if *port as usize >= MAX_PLAYERS {
                warnings.push(format!(
                    "session.controller_ports[{}] = {} is not a valid port",
                    player, port
                ));
            }
        }

        if !(1..=MAX_TICK_RATE).contains(&self.timing.tick_rate) {
            warnings.push(format!(
                "timing.tick_rate {} is outside 1-{}",
                self.timing.tick_rate, MAX_TICK_RATE
            ));
        }
        if self.timing.max_frame_time_ms == 0 {
            warnings.push("timing.max_frame_time_ms of 0 stops the simulation".to_string());
        }
        if self.timing.refresh_rate == 0 {
            warnings.push("timing.refresh_rate must be greater than 0".to_string());
        }

        if self.debug.skip_menu && self.debug.minigame_to_test.is_empty() {
            warnings.push("debug.skip_menu is set but debug.minigame_to_test is empty".to_string());
        }

        warnings
    }
}

/// Platform-specific configuration directory.
///
/// On Linux: `~/.config/minigames`. Returns `None` if the home directory
/// cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "minigames", "minigames")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of `config.toml`.
pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Load the configuration from a specific file.
///
/// A missing file yields the defaults; a file that exists but cannot be read
/// or parsed is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the configuration from the platform config directory.
pub fn load() -> Result<Config, ConfigError> {
    match default_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

/// Write the configuration to `path`, creating parent directories.
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)
}
