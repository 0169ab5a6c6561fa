//! Shared test doubles for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::minigame::{FixedUpdate, Minigame, MinigameDescriptor};
use crate::platform::{ControllerPort, Display, GameSelector, InputFrame, InputSource};
use crate::registry::MinigameRegistry;
use crate::state::{AiDifficulty, CoreState, PlayerIndex};

// ============================================================================
// Probe minigame
// ============================================================================

/// What the next [`ProbeGame`] built on this thread should do.
#[derive(Debug, Clone, Default)]
pub struct ProbeScript {
    /// Expose a fixed tick
    pub fixed: bool,
    /// End the game during the Nth variable tick (1-based)
    pub end_on_variable: Option<u32>,
    /// End the game during the Nth fixed tick (1-based)
    pub end_on_fixed: Option<u32>,
    /// Winners marked when the game ends
    pub winners: Vec<PlayerIndex>,
    /// Make `init` fail
    pub fail_init: bool,
}

/// What probes on this thread observed.
#[derive(Debug, Clone, Default)]
pub struct ProbeRecord {
    pub init: u32,
    pub fixed: u32,
    pub variable: u32,
    pub cleanup: u32,
    /// `dt` of every fixed tick
    pub dts: Vec<Duration>,
    /// Subtick seen by every variable tick
    pub subticks: Vec<f64>,
    /// Winners already set when each variable tick started
    pub winners_at_start: Vec<usize>,
    /// Ordered lifecycle and display events
    pub events: Vec<&'static str>,
    /// Player count, controller ports of human players and AI difficulty
    /// seen by each `init`
    pub seen_at_init: Vec<(u32, Vec<ControllerPort>, AiDifficulty)>,
}

#[derive(Default)]
struct Probe {
    script: ProbeScript,
    record: ProbeRecord,
}

thread_local! {
    // Factories are plain fn pointers, so the probe talks to tests through
    // thread-local state. Each test runs on its own thread.
    static PROBE: RefCell<Probe> = RefCell::new(Probe::default());
}

/// Reset the probe record and set the script for the next game.
pub fn script_probe(script: ProbeScript) {
    PROBE.with(|p| {
        *p.borrow_mut() = Probe {
            script,
            record: ProbeRecord::default(),
        }
    });
}

/// Snapshot of what has been observed so far.
pub fn probe_record() -> ProbeRecord {
    PROBE.with(|p| p.borrow().record.clone())
}

fn record(f: impl FnOnce(&mut ProbeRecord)) {
    PROBE.with(|p| f(&mut p.borrow_mut().record));
}

/// Minigame that counts its lifecycle calls.
pub struct ProbeGame {
    script: ProbeScript,
    variable_calls: u32,
    fixed_calls: u32,
}

impl ProbeGame {
    pub fn boxed() -> Box<dyn Minigame> {
        let script = PROBE.with(|p| p.borrow().script.clone());
        Box::new(ProbeGame {
            script,
            variable_calls: 0,
            fixed_calls: 0,
        })
    }

    fn finish(&self, core: &mut CoreState) {
        for winner in &self.script.winners {
            core.set_winner(*winner);
        }
        core.end_game();
    }
}

impl Minigame for ProbeGame {
    fn init(&mut self, core: &mut CoreState) -> Result<()> {
        let ports = PlayerIndex::ALL
            .into_iter()
            .filter(|p| core.is_human(*p))
            .map(|p| core.controller_for(p))
            .collect();
        let seen = (core.player_count(), ports, core.ai_difficulty());
        record(|r| {
            r.init += 1;
            r.events.push("init");
            r.seen_at_init.push(seen);
        });
        if self.script.fail_init {
            bail!("probe init failed");
        }
        Ok(())
    }

    fn fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        if self.script.fixed { Some(self) } else { None }
    }

    fn variable_tick(&mut self, core: &mut CoreState, _frame_time: Duration) -> Result<()> {
        self.variable_calls += 1;
        let winners = core.winners().len();
        let subtick = core.subtick();
        record(|r| {
            r.variable += 1;
            r.subticks.push(subtick);
            r.winners_at_start.push(winners);
            r.events.push("variable");
        });
        if self.script.end_on_variable == Some(self.variable_calls) {
            self.finish(core);
        }
        Ok(())
    }

    fn cleanup(&mut self, _core: &mut CoreState) -> Result<()> {
        record(|r| {
            r.cleanup += 1;
            r.events.push("cleanup");
        });
        Ok(())
    }
}

impl FixedUpdate for ProbeGame {
    fn fixed_tick(&mut self, core: &mut CoreState, dt: Duration) -> Result<()> {
        self.fixed_calls += 1;
        record(|r| {
            r.fixed += 1;
            r.dts.push(dt);
            r.events.push("fixed");
        });
        if self.script.end_on_fixed == Some(self.fixed_calls) {
            self.finish(core);
        }
        Ok(())
    }
}

/// Descriptor backed by [`ProbeGame`].
pub fn probe_descriptor(id: &str) -> MinigameDescriptor {
    MinigameDescriptor::new(id, id.to_uppercase(), ProbeGame::boxed)
        .with_author("Test Author")
        .with_description("Counts lifecycle calls")
}

// ============================================================================
// Platform doubles
// ============================================================================

/// Display that replays a fixed list of frame times.
///
/// Once the script runs out it keeps returning `fallback`.
pub struct ScriptedDisplay {
    frames: VecDeque<Duration>,
    fallback: Duration,
    pub presented: u32,
    pub drained: u32,
}

impl ScriptedDisplay {
    pub fn new(frames: impl IntoIterator<Item = Duration>, fallback: Duration) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            fallback,
            presented: 0,
            drained: 0,
        }
    }

    /// Every frame takes `frame_time`.
    pub fn constant(frame_time: Duration) -> Self {
        Self::new([], frame_time)
    }
}

impl Display for ScriptedDisplay {
    fn frame_time(&mut self) -> Duration {
        self.frames.pop_front().unwrap_or(self.fallback)
    }

    fn present(&mut self) {
        self.presented += 1;
        record(|r| r.events.push("present"));
    }

    fn wait_idle(&mut self) {
        self.drained += 1;
        record(|r| r.events.push("wait_idle"));
    }
}

/// Input source that counts polls.
#[derive(Debug, Default)]
pub struct CountingInput {
    pub polls: u32,
}

impl InputSource for CountingInput {
    fn poll(&mut self) -> InputFrame {
        self.polls += 1;
        InputFrame::default()
    }
}

/// Selector that hands out a fixed list of names.
pub struct ListSelector {
    names: VecDeque<String>,
}

impl ListSelector {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl GameSelector for ListSelector {
    fn select_game(&mut self, _registry: &MinigameRegistry) -> Option<String> {
        self.names.pop_front()
    }
}
