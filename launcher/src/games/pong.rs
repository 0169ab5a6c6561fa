//! Pong for up to four players
//!
//! Each player guards one side of the court. The ball flies from side to side
//! and a player whose paddle is not under it when it lands loses a life. The
//! last player with lives left wins. Slots past the player count are AI.
//!
//! Headless: the "screen" is the log. Countdown, "GO!", misses and the winner
//! banner are printed as they would be drawn.

use std::time::Duration;

use anyhow::Result;
use minigame_core::platform::button;
use minigame_core::{AiDifficulty, CoreState, FixedUpdate, MAX_PLAYERS, Minigame, PlayerIndex};
use rand::Rng;
use rand_pcg::Pcg32;

const COUNTDOWN_DELAY: f32 = 3.0;
const GO_DELAY: f32 = 1.0;
const WIN_DELAY: f32 = 5.0;
const WIN_SHOW_DELAY: f32 = 2.0;

const STARTING_LIVES: u8 = 3;

/// Paddle positions and landing points are on [-1, 1] along each side
const PADDLE_HALF_WIDTH: f32 = 0.25;

/// Human paddle speed at full stick, court widths per second
const PADDLE_SPEED: f32 = 2.0;

/// Seconds from one side to the next
const BALL_FLIGHT_TIME: f32 = 0.6;

#[derive(Debug, Clone, Copy)]
struct Paddle {
    pos: f32,
    lives: u8,
    human: bool,
}

impl Paddle {
    fn alive(&self) -> bool {
        self.lives > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Ball {
    target: PlayerIndex,
    /// Where on the target's side it lands
    impact: f32,
    /// Seconds until it lands
    remaining: f32,
}

/// AI paddle speed and chance to fumble a ball it reached
fn ai_tuning(difficulty: AiDifficulty) -> (f32, f32) {
    match difficulty {
        AiDifficulty::Easy => (0.8, 0.30),
        AiDifficulty::Medium => (1.4, 0.15),
        AiDifficulty::Hard => (2.2, 0.05),
    }
}

pub struct Pong {
    rng: Pcg32,
    difficulty: AiDifficulty,
    paddles: [Paddle; MAX_PLAYERS],
    ball: Ball,
    countdown_timer: f32,
    end_timer: f32,
    is_ending: bool,
}

impl Pong {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            rng,
            difficulty: AiDifficulty::default(),
            paddles: [Paddle {
                pos: 0.0,
                lives: STARTING_LIVES,
                human: false,
            }; MAX_PLAYERS],
            ball: Ball {
                target: PlayerIndex::Player1,
                impact: 0.0,
                remaining: BALL_FLIGHT_TIME,
            },
            countdown_timer: COUNTDOWN_DELAY,
            end_timer: 0.0,
            is_ending: false,
        }
    }

    /// Factory used by the registry.
    pub fn boxed() -> Box<dyn Minigame> {
        Box::new(Self::new(super::session_rng()))
    }

    fn is_countdown(&self) -> bool {
        self.countdown_timer > 0.0
    }

    fn can_control(&self) -> bool {
        !self.is_ending && !self.is_countdown()
    }

    fn alive_players(&self) -> Vec<PlayerIndex> {
        PlayerIndex::ALL
            .into_iter()
            .filter(|p| self.paddles[p.index()].alive())
            .collect()
    }

    /// Send the ball to a random live player other than `from`.
    fn serve(&mut self, from: Option<PlayerIndex>) {
        let alive = self.alive_players();
        let mut candidates: Vec<PlayerIndex> =
            alive.iter().copied().filter(|p| Some(*p) != from).collect();
        if candidates.is_empty() {
            candidates = alive;
        }
        let Some(&target) = candidates.get(self.rng.random_range(0..candidates.len().max(1)))
        else {
            return;
        };

        self.ball = Ball {
            target,
            impact: self.rng.random_range(-1.0..=1.0),
            remaining: BALL_FLIGHT_TIME,
        };
    }

    /// AI paddles slide toward the landing point, or back to centre when the
    /// ball is going elsewhere.
    fn move_ai(&mut self, dt: f32) {
        let (speed, _) = ai_tuning(self.difficulty);
        let step = speed * dt;
        for player in PlayerIndex::ALL {
            let goal = if self.ball.target == player {
                self.ball.impact
            } else {
                0.0
            };
            let paddle = &mut self.paddles[player.index()];
            if paddle.human || !paddle.alive() {
                continue;
            }
            paddle.pos += (goal - paddle.pos).clamp(-step, step);
        }
    }

    fn land_ball(&mut self, core: &mut CoreState) {
        let player = self.ball.target;
        let paddle = self.paddles[player.index()];
        let (_, fumble_chance) = ai_tuning(self.difficulty);

        let in_reach = (paddle.pos - self.ball.impact).abs() <= PADDLE_HALF_WIDTH;
        let fumbled = !paddle.human && self.rng.random::<f32>() < fumble_chance;
        if in_reach && !fumbled {
            tracing::trace!("{player} returns the ball");
            self.serve(Some(player));
            return;
        }

        let lives = {
            let paddle = &mut self.paddles[player.index()];
            paddle.lives = paddle.lives.saturating_sub(1);
            paddle.lives
        };
        if lives == 0 {
            tracing::info!("{player} misses and is out");
        } else {
            tracing::info!("{player} misses ({lives} lives left)");
        }

        let alive = self.alive_players();
        if let [winner] = alive.as_slice() {
            core.set_winner(*winner);
            self.is_ending = true;
        } else {
            self.serve(None);
        }
    }
}

impl Minigame for Pong {
    fn init(&mut self, core: &mut CoreState) -> Result<()> {
        self.difficulty = core.ai_difficulty();
        for player in PlayerIndex::ALL {
            self.paddles[player.index()].human = core.is_human(player);
        }
        self.countdown_timer = COUNTDOWN_DELAY;
        self.serve(None);

        tracing::info!(
            "Pong: {} human(s), {} AI ({})",
            core.player_count(),
            MAX_PLAYERS as u32 - core.player_count(),
            self.difficulty
        );
        tracing::info!("Pong: {}", COUNTDOWN_DELAY.ceil());
        Ok(())
    }

    fn fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        Some(self)
    }

    fn variable_tick(&mut self, core: &mut CoreState, frame_time: Duration) -> Result<()> {
        if !self.can_control() {
            return Ok(());
        }

        let dt = frame_time.as_secs_f32();
        for player in PlayerIndex::ALL {
            if !self.paddles[player.index()].human || !self.paddles[player.index()].alive() {
                continue;
            }

            let state = core.controller_state(core.controller_for(player));
            let mut axis = state.stick_x;
            if state.held(button::D_LEFT) {
                axis -= 1.0;
            }
            if state.held(button::D_RIGHT) {
                axis += 1.0;
            }

            let paddle = &mut self.paddles[player.index()];
            paddle.pos = (paddle.pos + axis.clamp(-1.0, 1.0) * PADDLE_SPEED * dt).clamp(-1.0, 1.0);
        }
        Ok(())
    }

    fn cleanup(&mut self, _core: &mut CoreState) -> Result<()> {
        tracing::debug!("Pong cleaned up");
        Ok(())
    }
}

impl FixedUpdate for Pong {
    fn fixed_tick(&mut self, core: &mut CoreState, dt: Duration) -> Result<()> {
        let dt = dt.as_secs_f32();
        let could_control = self.can_control();

        if self.countdown_timer > -GO_DELAY {
            let prev = self.countdown_timer;
            self.countdown_timer -= dt;
            if prev.ceil() != self.countdown_timer.ceil() && self.countdown_timer > 0.0 {
                tracing::info!("Pong: {}", self.countdown_timer.ceil());
            }
        }

        if self.is_ending {
            let prev = self.end_timer;
            self.end_timer += dt;
            if prev < WIN_SHOW_DELAY && self.end_timer >= WIN_SHOW_DELAY {
                for player in PlayerIndex::ALL.into_iter().filter(|p| core.is_winner(*p)) {
                    tracing::info!("Pong: {player} wins!");
                }
            }
            if self.end_timer > WIN_DELAY {
                core.end_game();
            }
        }

        if !self.can_control() {
            return Ok(());
        }

        if !could_control {
            tracing::info!("Pong: GO!");
        }

        self.move_ai(dt);
        self.ball.remaining -= dt;
        if self.ball.remaining <= 0.0 {
            self.land_ball(core);
        }
        Ok(())
    }
}
