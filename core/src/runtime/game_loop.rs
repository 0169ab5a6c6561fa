//! One frame of the fixed-timestep loop

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::minigame::Minigame;
use crate::platform::InputSource;
use crate::state::CoreState;

use super::LoopConfig;

/// What a single frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Fixed ticks drained from the accumulator this frame
    pub ticks: u32,
    /// Interpolation factor published to the variable tick
    pub subtick: f64,
    /// Frame time after clamping
    pub frame_time: Duration,
    /// Whether the measured frame time was clamped
    pub clamped: bool,
}

/// Execute a single frame.
///
/// `frame_time` is the measured wall-clock time since the previous frame.
/// It is clamped, accumulated and drained in whole ticks (calling the game's
/// fixed tick if it has one); then input is polled, the sub-tick fraction
/// published and the variable tick run exactly once.
pub fn execute_frame<I: InputSource + ?Sized>(
    config: &LoopConfig,
    tick_duration: Duration,
    accumulator: &mut Duration,
    frame_time: Duration,
    game: &mut dyn Minigame,
    core: &mut CoreState,
    input: &mut I,
) -> Result<FrameStats> {
    // Excess lag is dropped, never queued
    let clamped = frame_time > config.max_frame_time;
    let frame_time = if clamped {
        tracing::debug!(
            "Frame took {:?}, clamping to {:?}",
            frame_time,
            config.max_frame_time
        );
        config.max_frame_time
    } else {
        frame_time
    };

    *accumulator += frame_time;

    let mut ticks = 0u32;
    while *accumulator >= tick_duration {
        let tick_start = Instant::now();

        if let Some(fixed) = game.fixed_update() {
            fixed.fixed_tick(core, tick_duration)?;
        }

        *accumulator -= tick_duration;
        ticks += 1;

        let tick_time = tick_start.elapsed();
        if tick_time > config.tick_budget {
            tracing::warn!(
                "Tick took {:?}, exceeds budget of {:?}",
                tick_time,
                config.tick_budget
            );
        }
    }

    // Sampled at display rate, consumed by whichever tick reads it next
    core.set_input(input.poll());

    // accumulator < tick_duration here, so this is in [0, 1)
    let subtick = accumulator.as_secs_f64() / tick_duration.as_secs_f64();
    core.set_subtick(subtick);

    game.variable_tick(core, frame_time)?;

    Ok(FrameStats {
        ticks,
        subtick,
        frame_time,
        clamped,
    })
}
