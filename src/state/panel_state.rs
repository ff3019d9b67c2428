//! Display mode and timer/stopwatch state machine
//!
//! Every action is a plain state transition that may ask the caller to start
//! or cancel the repeating ticker of one sub-mode. Nothing here schedules
//! anything by itself.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::timer_state::{CountdownState, StopwatchState, TickOutcome, TimerPreset};

/// Which panel is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Clock,
    TimerStopwatch,
}

/// Active tab of the timer/stopwatch panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubMode {
    #[default]
    Timer,
    Stopwatch,
}

impl SubMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubMode::Timer => "timer",
            SubMode::Stopwatch => "stopwatch",
        }
    }
}

impl fmt::Display for SubMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timer" => Ok(SubMode::Timer),
            "stopwatch" => Ok(SubMode::Stopwatch),
            other => Err(format!("Unknown sub-mode: {}", other)),
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerCommand {
    Start(SubMode),
    Cancel(SubMode),
}

/// Mode flags plus both counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    pub display_mode: DisplayMode,
    pub sub_mode: SubMode,
    pub timer: CountdownState,
    pub stopwatch: StopwatchState,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, sub_mode: SubMode) -> bool {
        match sub_mode {
            SubMode::Timer => self.timer.running,
            SubMode::Stopwatch => self.stopwatch.running,
        }
    }

    /// Seconds shown by the shared panel display
    pub fn active_seconds(&self) -> u64 {
        match self.sub_mode {
            SubMode::Timer => self.timer.remaining_seconds,
            SubMode::Stopwatch => self.stopwatch.elapsed_seconds,
        }
    }

    /// Controls only respond while their tab is on screen
    fn controls_visible(&self, sub_mode: SubMode) -> bool {
        self.display_mode == DisplayMode::TimerStopwatch && self.sub_mode == sub_mode
    }

    /// Clear the running flag of `sub_mode`, keeping its counter
    fn halt(&mut self, sub_mode: SubMode) -> Option<TickerCommand> {
        let running = match sub_mode {
            SubMode::Timer => &mut self.timer.running,
            SubMode::Stopwatch => &mut self.stopwatch.running,
        };
        if *running {
            *running = false;
            Some(TickerCommand::Cancel(sub_mode))
        } else {
            None
        }
    }

    /// Flip between the clock and the timer/stopwatch panel
    pub fn toggle_display_mode(&mut self) -> Option<TickerCommand> {
        match self.display_mode {
            DisplayMode::Clock => {
                self.display_mode = DisplayMode::TimerStopwatch;
                None
            }
            DisplayMode::TimerStopwatch => {
                self.display_mode = DisplayMode::Clock;
                // Only the active tab can be running
                self.halt(SubMode::Timer).or_else(|| self.halt(SubMode::Stopwatch))
            }
        }
    }

    /// Switch tabs, pausing whatever the previous tab was doing
    pub fn select_sub_mode(&mut self, sub_mode: SubMode) -> Option<TickerCommand> {
        if self.sub_mode == sub_mode {
            return None;
        }
        let previous = self.sub_mode;
        self.sub_mode = sub_mode;
        self.halt(previous)
    }

    pub fn start_pause(&mut self, sub_mode: SubMode) -> Option<TickerCommand> {
        if !self.controls_visible(sub_mode) {
            return None;
        }
        if self.is_running(sub_mode) {
            return self.halt(sub_mode);
        }
        match sub_mode {
            SubMode::Timer => self.timer.running = true,
            SubMode::Stopwatch => self.stopwatch.running = true,
        }
        Some(TickerCommand::Start(sub_mode))
    }

    pub fn reset(&mut self, sub_mode: SubMode) -> Option<TickerCommand> {
        if !self.controls_visible(sub_mode) {
            return None;
        }
        let command = self.halt(sub_mode);
        match sub_mode {
            SubMode::Timer => self.timer.reset(),
            SubMode::Stopwatch => self.stopwatch.reset(),
        }
        command
    }

    /// Returns false when the timer tab is not on screen
    pub fn apply_preset(&mut self, preset: TimerPreset) -> bool {
        if !self.controls_visible(SubMode::Timer) {
            return false;
        }
        self.timer.apply_preset(preset);
        true
    }

    pub fn tick(&mut self, sub_mode: SubMode) -> TickOutcome {
        match sub_mode {
            SubMode::Timer => self.timer.tick(),
            SubMode::Stopwatch => self.stopwatch.tick(),
        }
    }
}
