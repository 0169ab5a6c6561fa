//! Platform collaborator traits and input types
//!
//! The session loop never talks to hardware directly. A launcher supplies a
//! [`Display`] (frame pacing and presentation), an [`InputSource`] (controller
//! polling) and a [`GameSelector`] (the menu that names the next minigame).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::registry::MinigameRegistry;
use crate::state::MAX_PLAYERS;

/// Physical controller port a logical player is plugged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerPort(pub u8);

impl ControllerPort {
    /// Port index as a slot into an [`InputFrame`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ControllerPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {}", self.0 + 1)
    }
}

/// Conventional bit assignments for [`ControllerState::buttons`].
///
/// The core never reads these; they exist so input sources and minigames
/// agree on a layout.
pub mod button {
    pub const A: u16 = 1 << 0;
    pub const B: u16 = 1 << 1;
    pub const Z: u16 = 1 << 2;
    pub const START: u16 = 1 << 3;
    pub const D_UP: u16 = 1 << 4;
    pub const D_DOWN: u16 = 1 << 5;
    pub const D_LEFT: u16 = 1 << 6;
    pub const D_RIGHT: u16 = 1 << 7;
    pub const L: u16 = 1 << 8;
    pub const R: u16 = 1 << 9;
    pub const C_UP: u16 = 1 << 10;
    pub const C_DOWN: u16 = 1 << 11;
    pub const C_LEFT: u16 = 1 << 12;
    pub const C_RIGHT: u16 = 1 << 13;
}

/// Button/axis snapshot of one controller port.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerState {
    /// Buttons currently held (bit layout in [`button`])
    pub buttons: u16,
    /// Buttons that went down since the previous poll
    pub pressed: u16,
    /// Analog stick (-1.0 to 1.0)
    pub stick_x: f32,
    pub stick_y: f32,
    /// Whether anything is plugged into this port
    pub connected: bool,
}

impl ControllerState {
    /// True if every bit in `mask` is held.
    pub fn held(&self, mask: u16) -> bool {
        self.buttons & mask == mask
    }

    /// True if every bit in `mask` went down this poll.
    pub fn just_pressed(&self, mask: u16) -> bool {
        self.pressed & mask == mask
    }
}

/// One poll's worth of controller snapshots, indexed by port.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub ports: [ControllerState; MAX_PLAYERS],
}

impl InputFrame {
    /// Snapshot for a port. Ports past [`MAX_PLAYERS`] read as disconnected.
    pub fn port(&self, port: ControllerPort) -> ControllerState {
        self.ports.get(port.index()).copied().unwrap_or_default()
    }
}

/// Presentation source: frame pacing, frame submission and back-end draining.
pub trait Display {
    /// Wait for the next display-ready signal and return the wall-clock time
    /// elapsed since the previous call.
    ///
    /// This is the only place the loop is allowed to block.
    fn frame_time(&mut self) -> Duration;

    /// Submit the frame the variable tick just produced.
    fn present(&mut self) {}

    /// Block until every piece of submitted rendering work has completed.
    ///
    /// Called before a minigame's `cleanup` so it can free resources that
    /// queued work might still reference.
    fn wait_idle(&mut self) {}
}

/// Controller source, polled once per frame.
pub trait InputSource {
    /// Sample every configured port.
    fn poll(&mut self) -> InputFrame;
}

/// The menu (or test harness) that decides what to play next.
pub trait GameSelector {
    /// Name of the next minigame to run, or `None` to stop the outer loop.
    fn select_game(&mut self, registry: &MinigameRegistry) -> Option<String>;
}

/// Input source with nothing plugged in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputSource for NullInput {
    fn poll(&mut self) -> InputFrame {
        InputFrame::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_out_of_range_port_is_disconnected() {
        let frame = InputFrame::default();
        assert!(!frame.port(ControllerPort(9)).connected);
    }

    #[test]
    fn test_controller_state_masks() {
        let state = ControllerState {
            buttons: button::A | button::START,
            pressed: button::A,
            ..Default::default()
        };
        assert!(state.held(button::A | button::START));
        assert!(!state.held(button::A | button::B));
        assert!(state.just_pressed(button::A));
        assert!(!state.just_pressed(button::START));
    }

    #[test]
    fn test_controller_port_display_is_one_based() {
        assert_eq!(ControllerPort(0).to_string(), "port 1");
    }
}
