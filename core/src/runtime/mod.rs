//! Session orchestration
//!
//! Drives one selected minigame at a fixed tick rate while presenting at the
//! display's own rate, then tears it down and goes back to selection.

use std::fmt;
use std::time::Duration;

use anyhow::Result;

use crate::config::SessionConfig;
use crate::minigame::{Minigame, MinigameDescriptor};
use crate::platform::{Display, GameSelector, InputSource};
use crate::registry::MinigameRegistry;
use crate::state::{CoreState, Winners};

mod config;
mod game_loop;


pub use config::{LoopConfig, MAX_TICK_RATE};
pub use game_loop::{FrameStats, execute_frame};

/// Where the loop is in a session's life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No minigame selected
    Idle,
    /// Minigame chosen, core state reset
    Selected,
    /// `init` running
    Initializing,
    /// Alternating fixed and variable ticks
    Running,
    /// The minigame has ended; finishing the last frame
    Ending,
    /// Draining the display and running `cleanup`
    CleaningUp,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Selected => "selected",
            SessionPhase::Initializing => "initializing",
            SessionPhase::Running => "running",
            SessionPhase::Ending => "ending",
            SessionPhase::CleaningUp => "cleaning up",
        };
        f.write_str(name)
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    /// Id of the minigame that ran
    pub minigame: String,
    /// Every player marked as a winner, in player order
    pub winners: Winners,
    /// Frames presented
    pub frames: u64,
    /// Fixed ticks drained
    pub ticks: u64,
    /// Simulated time (sum of clamped frame times)
    pub elapsed: Duration,
}

/// The master loop.
///
/// Owns the display and input collaborators plus the registry. Each session
/// gets its own [`CoreState`], built from `session`.
pub struct SessionLoop<D: Display, I: InputSource> {
    display: D,
    input: I,
    registry: MinigameRegistry,
    session: SessionConfig,
    config: LoopConfig,
    tick_duration: Duration,
    phase: SessionPhase,
}

impl<D: Display, I: InputSource> SessionLoop<D, I> {
    /// Create a loop with the default 30 Hz timing.
    pub fn new(display: D, input: I, registry: MinigameRegistry, session: SessionConfig) -> Self {
        Self::with_config(display, input, registry, session, LoopConfig::default())
    }

    pub fn with_config(
        display: D,
        input: I,
        registry: MinigameRegistry,
        session: SessionConfig,
        mut config: LoopConfig,
    ) -> Self {
        config.tick_rate = config::clamp_tick_rate(config.tick_rate);
        let tick_duration = config.tick_duration();
        Self {
            display,
            input,
            registry,
            session,
            config,
            tick_duration,
            phase: SessionPhase::Idle,
        }
    }

    /// Set the tick rate, clamped to `1..=MAX_TICK_RATE`
    pub fn set_tick_rate(&mut self, tick_rate: u32) {
        self.config.tick_rate = config::clamp_tick_rate(tick_rate);
        self.tick_duration = self.config.tick_duration();
    }

    pub fn tick_rate(&self) -> u32 {
        self.config.tick_rate
    }

    /// Time per fixed tick (inverse of the tick rate)
    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn registry(&self) -> &MinigameRegistry {
        &self.registry
    }

    /// Settings used for the next session's `CoreState`
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    pub fn session_config_mut(&mut self) -> &mut SessionConfig {
        &mut self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Keep asking `selector` for minigames and play each one, until it
    /// returns `None`.
    ///
    /// Stops at the first error: an unknown name is a configuration error
    /// and a failing lifecycle call is fatal.
    pub fn run(&mut self, selector: &mut dyn GameSelector) -> Result<Vec<SessionReport>> {
        let mut reports = Vec::new();
        while let Some(name) = selector.select_game(&self.registry) {
            reports.push(self.run_session(&name)?);
        }
        tracing::info!("Selection finished after {} session(s)", reports.len());
        Ok(reports)
    }

    /// Play one complete session of the minigame with this exact id.
    pub fn run_session(&mut self, name: &str) -> Result<SessionReport> {
        let descriptor = self.registry.select(name)?.clone();
        self.phase = SessionPhase::Selected;

        let mut core = CoreState::new(&self.session);
        core.reset_winners();

        let mut game = descriptor.instantiate();
        let result = self.play(&descriptor, game.as_mut(), &mut core);

        self.registry.clear_selection();
        self.phase = SessionPhase::Idle;
        result
    }

    fn play(
        &mut self,
        descriptor: &MinigameDescriptor,
        game: &mut dyn Minigame,
        core: &mut CoreState,
    ) -> Result<SessionReport> {
        tracing::info!(
            "Starting '{}' by {} ({} player(s), AI {})",
            descriptor.name,
            if descriptor.author.is_empty() { "unknown" } else { descriptor.author.as_str() },
            core.player_count(),
            core.ai_difficulty()
        );

        self.phase = SessionPhase::Initializing;
        game.init(core)?;

        self.phase = SessionPhase::Running;
        let mut accumulator = Duration::ZERO;
        let mut frames = 0u64;
        let mut ticks = 0u64;
        let mut elapsed = Duration::ZERO;

        while !core.has_ended() {
            let frame_time = self.display.frame_time();
            let stats = execute_frame(
                &self.config,
                self.tick_duration,
                &mut accumulator,
                frame_time,
                game,
                core,
                &mut self.input,
            )?;
            if core.has_ended() {
                self.phase = SessionPhase::Ending;
            }
            self.display.present();

            frames += 1;
            ticks += u64::from(stats.ticks);
            elapsed += stats.frame_time;
        }

        self.phase = SessionPhase::CleaningUp;
        self.display.wait_idle();
        game.cleanup(core)?;

        let report = SessionReport {
            minigame: descriptor.id.clone(),
            winners: core.winners(),
            frames,
            ticks,
            elapsed,
        };
        tracing::info!(
            "'{}' finished after {} frames / {} ticks, winners: {}",
            descriptor.name,
            frames,
            ticks,
            format_winners(&report.winners)
        );
        Ok(report)
    }
}

fn format_winners(winners: &Winners) -> String {
    if winners.is_empty() {
        return "none".to_string();
    }
    winners
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
