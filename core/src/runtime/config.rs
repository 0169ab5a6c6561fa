//! Loop configuration

use std::time::Duration;

use crate::config::TimingConfig;

/// Highest supported fixed tick rate. Keeps `tick_duration` well above zero
/// and the per-frame catch-up bounded.
pub const MAX_TICK_RATE: u32 = 1000;

/// Fixed-timestep loop configuration
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Fixed ticks per second
    pub tick_rate: u32,
    /// Maximum frame time fed into the accumulator (prevents spiral of death)
    pub max_frame_time: Duration,
    /// Per-tick time above which a warning is logged
    pub tick_budget: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            max_frame_time: Duration::from_millis(250),
            tick_budget: Duration::from_micros(8333), // a quarter of a 30 Hz tick
        }
    }
}

impl LoopConfig {
    /// Duration of one fixed tick. Never shorter than 1 ms.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / clamp_tick_rate(self.tick_rate) as f64)
    }
}

impl From<&TimingConfig> for LoopConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            tick_rate: clamp_tick_rate(timing.tick_rate),
            max_frame_time: timing.max_frame_time(),
            tick_budget: timing.tick_budget(),
        }
    }
}

/// Clamp a tick rate into `1..=MAX_TICK_RATE`.
pub(crate) fn clamp_tick_rate(tick_rate: u32) -> u32 {
    let clamped = tick_rate.clamp(1, MAX_TICK_RATE);
    if clamped != tick_rate {
        tracing::warn!("Tick rate {} out of range, using {}", tick_rate, clamped);
    }
    clamped
}
