//! Minigame lifecycle contract
//!
//! Every minigame is a [`Minigame`] trait object built fresh for each session
//! by the factory in its [`MinigameDescriptor`]. The session loop drives it:
//!
//! 1. `init` once
//! 2. per frame: `fixed_tick` zero or more times (only if the game exposes
//!    [`FixedUpdate`]), then `variable_tick` exactly once
//! 3. `cleanup` once, after the frame in which the game called
//!    [`CoreState::end_game`]

use std::fmt;
use std::time::Duration;

use anyhow::Result;

use crate::state::CoreState;

/// Lifecycle entry points of a minigame.
pub trait Minigame {
    /// Acquire resources and set up the initial game state.
    ///
    /// Must return; the loop has no timeout.
    fn init(&mut self, core: &mut CoreState) -> Result<()>;

    /// Fixed-rate capability, `None` for games without discrete physics.
    ///
    /// Games that want fixed ticks implement [`FixedUpdate`] and return
    /// `Some(self)`.
    fn fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        None
    }

    /// Once per frame. Reads [`CoreState::subtick`] to interpolate, renders,
    /// and marks winners / ends the game.
    fn variable_tick(&mut self, core: &mut CoreState, frame_time: Duration) -> Result<()>;

    /// Release everything acquired in `init`.
    fn cleanup(&mut self, core: &mut CoreState) -> Result<()>;
}

/// Optional fixed-timestep phase of a minigame.
pub trait FixedUpdate {
    /// Advance game rules by exactly `dt`. Must not read the wall clock.
    fn fixed_tick(&mut self, core: &mut CoreState, dt: Duration) -> Result<()>;
}

/// Builds a fresh minigame instance for one session.
pub type MinigameFactory = fn() -> Box<dyn Minigame>;

/// Registered metadata and entry point of one minigame.
#[derive(Clone)]
pub struct MinigameDescriptor {
    /// Registry key; `select` matches it exactly
    pub id: String,
    /// Display name shown in menus
    pub name: String,
    pub author: String,
    pub description: String,
    /// How to play
    pub instructions: String,
    factory: MinigameFactory,
}

impl MinigameDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, factory: MinigameFactory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author: String::new(),
            description: String::new(),
            instructions: String::new(),
            factory,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Create the session's minigame instance.
    pub fn instantiate(&self) -> Box<dyn Minigame> {
        (self.factory)()
    }
}

impl fmt::Debug for MinigameDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinigameDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("author", &self.author)
            .finish_non_exhaustive()
    }
}
