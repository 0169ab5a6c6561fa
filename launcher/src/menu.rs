//! Minigame selection
//!
//! [`TextMenu`] is the interactive menu: it lists the registry and reads a
//! choice from a line-based input. [`FixedSelector`] replays one id, which is
//! what `--game` and `debug.skip_menu` use.

use std::io::{BufRead, Write};

use minigame_core::registry::find_similar;
use minigame_core::{GameSelector, MinigameDescriptor, MinigameRegistry};

/// Counts down the `--sessions` limit. `None` is unlimited.
#[derive(Debug, Clone, Copy)]
struct SessionBudget(Option<u32>);

impl SessionBudget {
    fn take(&mut self) -> bool {
        match &mut self.0 {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

/// Selector that always picks the same minigame.
#[derive(Debug, Clone)]
pub struct FixedSelector {
    id: String,
    budget: SessionBudget,
}

impl FixedSelector {
    pub fn new(id: impl Into<String>, sessions: Option<u32>) -> Self {
        Self {
            id: id.into(),
            budget: SessionBudget(sessions),
        }
    }
}

impl GameSelector for FixedSelector {
    fn select_game(&mut self, _registry: &MinigameRegistry) -> Option<String> {
        self.budget.take().then(|| self.id.clone())
    }
}

/// Line-based menu over any reader/writer pair.
pub struct TextMenu<R, W> {
    input: R,
    output: W,
    budget: SessionBudget,
}

impl TextMenu<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Menu on the process's stdin/stdout.
    pub fn stdio(sessions: Option<u32>) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), sessions)
    }
}

impl<R: BufRead, W: Write> TextMenu<R, W> {
    pub fn new(input: R, output: W, sessions: Option<u32>) -> Self {
        Self {
            input,
            output,
            budget: SessionBudget(sessions),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn print_menu(&mut self, registry: &MinigameRegistry) -> std::io::Result<()> {
        writeln!(self.output, "Minigames:")?;
        for (i, descriptor) in registry.descriptors().iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, describe(descriptor))?;
        }
        Ok(())
    }

    /// Read lines until one names a minigame. `None` on quit or end of input.
    fn prompt(&mut self, registry: &MinigameRegistry) -> std::io::Result<Option<String>> {
        loop {
            write!(self.output, "Select a minigame (number or id, q to quit): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            let choice = line.trim();
            if choice.is_empty() {
                continue;
            }
            if choice.eq_ignore_ascii_case("q") || choice.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }

            if let Ok(number) = choice.parse::<usize>()
                && let Some(descriptor) = number
                    .checked_sub(1)
                    .and_then(|i| registry.descriptors().get(i))
            {
                return Ok(Some(descriptor.id.clone()));
            }

            if let Some(descriptor) = registry.get(choice) {
                return Ok(Some(descriptor.id.clone()));
            }

            let suggestions = find_similar(choice, registry.descriptors(), |d| d.id.as_str());
            if suggestions.is_empty() {
                writeln!(self.output, "No minigame called '{choice}'")?;
            } else {
                writeln!(
                    self.output,
                    "No minigame called '{choice}' (did you mean: {}?)",
                    suggestions.join(", ")
                )?;
            }
        }
    }
}

impl<R: BufRead, W: Write> GameSelector for TextMenu<R, W> {
    fn select_game(&mut self, registry: &MinigameRegistry) -> Option<String> {
        if !self.budget.take() {
            return None;
        }

        let choice = self
            .print_menu(registry)
            .and_then(|()| self.prompt(registry));
        let choice = match choice {
            Ok(choice) => choice,
            Err(e) => {
                tracing::warn!("Menu input failed: {}", e);
                None
            }
        };

        if let Some(id) = &choice
            && let Some(descriptor) = registry.get(id)
            && !descriptor.instructions.is_empty()
        {
            if let Err(e) = writeln!(self.output, "{}", descriptor.instructions) {
                tracing::warn!("Menu output failed: {}", e);
            }
        }
        choice
    }
}

/// One menu line: "pong - Pong by Aaron: This is a game of Pong."
pub fn describe(descriptor: &MinigameDescriptor) -> String {
    let mut line = format!("{} - {}", descriptor.id, descriptor.name);
    if !descriptor.author.is_empty() {
        line.push_str(&format!(" by {}", descriptor.author));
    }
    if !descriptor.description.is_empty() {
        line.push_str(&format!(": {}", descriptor.description));
    }
    line
}
