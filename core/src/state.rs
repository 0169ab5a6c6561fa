//! Per-session core state
//!
//! [`CoreState`] is the only state shared between the session loop and the
//! running minigame. A fresh one is built for every session and handed to each
//! lifecycle call by `&mut`, so nothing leaks from one session into the next.
//!
//! Minigames get the read accessors plus [`CoreState::set_winner`] and
//! [`CoreState::end_game`]. The setters the loop needs are `pub(crate)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::SessionConfig;
use crate::platform::{ControllerPort, ControllerState, InputFrame};

/// Maximum number of players in a session
pub const MAX_PLAYERS: usize = 4;

/// Standard player colours (0xRRGGBB), indexed by player
pub const PLAYER_COLORS: [u32; MAX_PLAYERS] = [0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00];

/// Logical player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerIndex {
    Player1,
    Player2,
    Player3,
    Player4,
}

impl PlayerIndex {
    /// Every player slot in order
    pub const ALL: [PlayerIndex; MAX_PLAYERS] = [
        PlayerIndex::Player1,
        PlayerIndex::Player2,
        PlayerIndex::Player3,
        PlayerIndex::Player4,
    ];

    /// Zero-based slot number
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Standard colour for this player
    pub fn color(self) -> u32 {
        PLAYER_COLORS[self.index()]
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Difficulty for AI-controlled player slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl AiDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiDifficulty::Easy => "easy",
            AiDifficulty::Medium => "medium",
            AiDifficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for AiDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" | "med" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            other => Err(format!(
                "unknown AI difficulty '{other}' (expected easy, medium or hard)"
            )),
        }
    }
}

/// Winner list, never larger than the player count
pub type Winners = SmallVec<[PlayerIndex; MAX_PLAYERS]>;

/// Shared state for one session.
///
/// Only the session loop can build one, and it cannot be cloned, so a
/// minigame has no way to swap in a state with fewer winners:
///
/// ```compile_fail
/// use minigame_core::{CoreState, SessionConfig};
/// let core = CoreState::new(&SessionConfig::default());
/// ```
///
/// ```compile_fail
/// fn rewind(core: &mut minigame_core::CoreState) {
///     let saved = core.clone();
///     *core = saved;
/// }
/// ```
#[derive(Debug)]
pub struct CoreState {
    /// Human players, 1..=MAX_PLAYERS
    player_count: u32,
    /// Logical player -> physical port
    controller_map: [ControllerPort; MAX_PLAYERS],
    ai_difficulty: AiDifficulty,
    /// Fraction of the current fixed tick elapsed when the variable tick runs
    subtick: f64,
    /// Bit N set = player N has won
    winners: u8,
    /// Set by the minigame when it is done
    ended: bool,
    /// Latest controller poll
    input: InputFrame,
}

impl CoreState {
    /// Build a clean state from the session settings.
    pub(crate) fn new(session: &SessionConfig) -> Self {
        let mut state = Self {
            player_count: 1,
            controller_map: session.controller_ports.map(ControllerPort),
            ai_difficulty: session.ai_difficulty,
            subtick: 0.0,
            winners: 0,
            ended: false,
            input: InputFrame::default(),
        };
        state.set_player_count(session.player_count);
        state
    }

    /// Number of human players.
    pub fn player_count(&self) -> u32 {
        self.player_count
    }

    /// Whether a slot is driven by a human (as opposed to the AI).
    pub fn is_human(&self, player: PlayerIndex) -> bool {
        (player.index() as u32) < self.player_count
    }

    /// Controller port of a human player.
    ///
    /// Only meaningful for `player < player_count()`; AI slots have no
    /// controller. Callers check [`CoreState::is_human`] first.
    pub fn controller_for(&self, player: PlayerIndex) -> ControllerPort {
        debug_assert!(
            self.is_human(player),
            "{player} is AI-controlled (player count {})",
            self.player_count
        );
        self.controller_map[player.index()]
    }

    /// Snapshot of a controller port from this frame's poll.
    pub fn controller_state(&self, port: ControllerPort) -> ControllerState {
        self.input.port(port)
    }

    pub fn ai_difficulty(&self) -> AiDifficulty {
        self.ai_difficulty
    }

    /// Interpolation factor in `[0, 1)` between the last two fixed ticks.
    pub fn subtick(&self) -> f64 {
        self.subtick
    }

    /// Mark a player as a winner. Repeat calls for the same player are no-ops;
    /// different players accumulate.
    pub fn set_winner(&mut self, player: PlayerIndex) {
        if self.winners & player.bit() == 0 {
            tracing::debug!("{player} marked as winner");
        }
        self.winners |= player.bit();
    }

    pub fn is_winner(&self, player: PlayerIndex) -> bool {
        self.winners & player.bit() != 0
    }

    /// Winners so far, in player order.
    pub fn winners(&self) -> Winners {
        PlayerIndex::ALL
            .into_iter()
            .filter(|p| self.is_winner(*p))
            .collect()
    }

    /// Signal that the minigame is finished. The loop stops after the current
    /// frame's variable tick.
    pub fn end_game(&mut self) {
        self.ended = true;
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// A state outside any session, for unit-testing minigames.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn detached(session: &SessionConfig) -> Self {
        Self::new(session)
    }

    pub(crate) fn set_player_count(&mut self, player_count: u32) {
        let clamped = player_count.clamp(1, MAX_PLAYERS as u32);
        if clamped != player_count {
            tracing::warn!(
                "Player count {} out of range, using {}",
                player_count,
                clamped
            );
        }
        self.player_count = clamped;
    }

    pub(crate) fn set_subtick(&mut self, subtick: f64) {
        debug_assert!((0.0..1.0).contains(&subtick), "subtick {subtick} out of [0, 1)");
        self.subtick = subtick;
    }

    pub(crate) fn set_input(&mut self, input: InputFrame) {
        self.input = input;
    }

    /// Clear winners and the end flag.
    pub(crate) fn reset_winners(&mut self) {
        self.winners = 0;
        self.ended = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CoreState {
        CoreState::new(&SessionConfig::default())
    }

    #[test]
    fn test_set_winner_is_idempotent() {
        let mut core = state();
        core.set_winner(PlayerIndex::Player3);
        core.set_winner(PlayerIndex::Player3);
        assert_eq!(core.winners().len(), 1);
    }

    #[test]
    fn test_set_winner_accumulates() {
        let mut core = state();
        core.set_winner(PlayerIndex::Player2);
        core.set_winner(PlayerIndex::Player3);
        assert_eq!(
            core.winners().as_slice(),
            &[PlayerIndex::Player2, PlayerIndex::Player3]
        );
    }

    #[test]
    fn test_reset_winners_clears_winners_and_end_flag() {
        let mut core = state();
        core.set_winner(PlayerIndex::Player1);
        core.set_winner(PlayerIndex::Player4);
        core.end_game();

        core.reset_winners();

        assert!(core.winners().is_empty());
        assert!(!core.has_ended());
    }

    #[test]
    fn test_player_count_is_clamped() {
        let mut core = state();
        core.set_player_count(9);
        assert_eq!(core.player_count(), MAX_PLAYERS as u32);
        core.set_player_count(0);
        assert_eq!(core.player_count(), 1);
    }

    #[test]
    fn test_ai_slots_follow_player_count() {
        let mut core = state();
        core.set_player_count(2);
        assert!(core.is_human(PlayerIndex::Player2));
        assert!(!core.is_human(PlayerIndex::Player3));
    }

    #[test]
    fn test_controller_mapping_comes_from_config() {
        let session = SessionConfig {
            controller_ports: [2, 0, 1, 3],
            ..Default::default()
        };
        let core = CoreState::new(&session);
        assert_eq!(core.controller_for(PlayerIndex::Player1), ControllerPort(2));
        assert_eq!(core.controller_for(PlayerIndex::Player3), ControllerPort(1));
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("HARD".parse::<AiDifficulty>(), Ok(AiDifficulty::Hard));
        assert_eq!("med".parse::<AiDifficulty>(), Ok(AiDifficulty::Medium));
        assert!("nightmare".parse::<AiDifficulty>().is_err());
    }

    #[test]
    fn test_player_display_and_color() {
        assert_eq!(PlayerIndex::Player4.to_string(), "Player 4");
        assert_eq!(PlayerIndex::Player2.color(), 0x00FF00);
        assert_eq!(PlayerIndex::from_index(4), None);
    }
}
