//! Minigame Core - Shared orchestration for a minigame collection
//!
//! This crate owns everything minigames have in common: the per-session
//! shared state, the registry of available minigames and the fixed-timestep
//! loop that drives whichever one is selected.
//!
//! # Architecture
//!
//! - [`Minigame`] - Lifecycle every minigame implements (init, ticks, cleanup)
//! - [`MinigameRegistry`] - Id lookup over the minigames a [`ModuleStorage`] provides
//! - [`CoreState`] - Players, controllers, AI difficulty and winners for one session
//! - [`SessionLoop`] - Select, init, tick, drain, cleanup, repeat
//! - [`platform`] - Display, input and menu collaborators supplied by the host

pub mod config;
pub mod minigame;
pub mod platform;
pub mod registry;
pub mod runtime;
pub mod state;
#[cfg(test)]
pub mod test_utils;

// Re-export core traits and types
pub use config::{Config, ConfigError, DebugConfig, SessionConfig, TimingConfig};
pub use minigame::{FixedUpdate, Minigame, MinigameDescriptor, MinigameFactory};
pub use platform::{
    ControllerPort, ControllerState, Display, GameSelector, InputFrame, InputSource, NullInput,
};
pub use registry::{
    BuiltinStorage, BundleStorage, EntryTable, MinigameManifest, MinigameRegistry, ModuleStorage,
    RegistryError,
};
pub use runtime::{FrameStats, LoopConfig, SessionLoop, SessionPhase, SessionReport};
pub use state::{AiDifficulty, CoreState, MAX_PLAYERS, PLAYER_COLORS, PlayerIndex, Winners};
