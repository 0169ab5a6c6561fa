//! Headless displays
//!
//! Nothing is drawn; these only decide how much time each frame represents.

use std::time::{Duration, Instant};

use minigame_core::Display;

/// Wall-clock display paced to a refresh rate.
///
/// `frame_time` sleeps until the next refresh deadline (the vsync stand-in)
/// and returns the real time since the previous call.
#[derive(Debug)]
pub struct SystemClockDisplay {
    period: Duration,
    last_frame: Instant,
    next_deadline: Instant,
}

impl SystemClockDisplay {
    pub fn new(period: Duration) -> Self {
        let now = Instant::now();
        Self {
            period,
            last_frame: now,
            next_deadline: now + period,
        }
    }
}

impl Display for SystemClockDisplay {
    fn frame_time(&mut self) -> Duration {
        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
        }

        let now = Instant::now();
        let elapsed = now - self.last_frame;
        self.last_frame = now;
        // Missed deadlines are not made up for
        self.next_deadline = (self.next_deadline + self.period).max(now);
        elapsed
    }
}

/// Display where every frame takes exactly `frame_time`.
///
/// Runs a session as fast as the CPU allows with reproducible timing.
#[derive(Debug, Clone)]
pub struct FixedFrameDisplay {
    frame_time: Duration,
    presented: u64,
}

impl FixedFrameDisplay {
    pub fn new(frame_time: Duration) -> Self {
        Self {
            frame_time,
            presented: 0,
        }
    }

    /// Frames presented so far
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Display for FixedFrameDisplay {
    fn frame_time(&mut self) -> Duration {
        self.frame_time
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_frame_display() {
        let mut display = FixedFrameDisplay::new(Duration::from_millis(16));
        assert_eq!(display.frame_time(), Duration::from_millis(16));
        assert_eq!(display.frame_time(), Duration::from_millis(16));
        display.present();
        assert_eq!(display.presented(), 1);
    }

    #[test]
    fn test_system_clock_display_waits_for_refresh() {
        let period = Duration::from_millis(5);
        let mut display = SystemClockDisplay::new(period);
        assert!(display.frame_time() >= period);
        assert!(display.frame_time() >= period);
    }

    #[test]
    fn test_system_clock_display_reports_late_frames() {
        let period = Duration::from_millis(2);
        let mut display = SystemClockDisplay::new(period);
        std::thread::sleep(Duration::from_millis(20));
        assert!(display.frame_time() >= Duration::from_millis(20));
    }
}
