//! Countdown and stopwatch counters

use serde::{Deserialize, Serialize};

/// Remaining seconds a fresh or reset countdown starts from
pub const DEFAULT_TIMER_SECONDS: u64 = 300;

/// Fixed countdown presets offered by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPreset {
    FiveMinutes,
    TenMinutes,
}

impl TimerPreset {
    /// Resolve a preset from its length in seconds
    pub fn from_seconds(seconds: u64) -> Option<Self> {
        match seconds {
            300 => Some(Self::FiveMinutes),
            600 => Some(Self::TenMinutes),
            _ => None,
        }
    }

    pub fn seconds(self) -> u64 {
        match self {
            Self::FiveMinutes => 300,
            Self::TenMinutes => 600,
        }
    }
}

/// Result of applying one tick to a running counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Counter advanced and keeps running
    Continue,
    /// Counter stopped on this tick; the ticker must end
    Finished,
    /// Counter was not running, nothing changed
    Idle,
}

/// Countdown timer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub running: bool,
    /// Preset the current value came from, only used to highlight its control
    pub selected_preset: TimerPreset,
}

impl CountdownState {
    /// Create a paused countdown at the default length
    pub fn new() -> Self {
        Self {
            remaining_seconds: DEFAULT_TIMER_SECONDS,
            running: false,
            selected_preset: TimerPreset::FiveMinutes,
        }
    }

    /// Apply one second of countdown.
    ///
    /// Stops on the tick that reaches zero, or on the first tick when started
    /// at zero. Never goes below zero.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            TickOutcome::Finished
        } else {
            TickOutcome::Continue
        }
    }

    /// Jump to a preset without touching the running flag
    pub fn apply_preset(&mut self, preset: TimerPreset) {
        self.remaining_seconds = preset.seconds();
        self.selected_preset = preset;
    }

    /// Stop and return to the hardcoded default, not the last preset
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = DEFAULT_TIMER_SECONDS;
        self.selected_preset = TimerPreset::FiveMinutes;
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Stopwatch state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchState {
    pub elapsed_seconds: u64,
    pub running: bool,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one second up; unbounded
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        TickOutcome::Continue
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_seconds = 0;
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours, so the
/// minute field may grow past two digits.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_decrements_once_per_tick_and_stops_at_zero() {
        let mut timer = CountdownState::new();
        timer.remaining_seconds = 3;
        timer.running = true;

        assert_eq!(timer.tick(), TickOutcome::Continue);
        assert_eq!(timer.remaining_seconds, 2);
        assert_eq!(timer.tick(), TickOutcome::Continue);
        assert_eq!(timer.tick(), TickOutcome::Finished);
        assert_eq!(timer.remaining_seconds, 0);
        assert!(!timer.running);

        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_seconds, 0);
    }

    #[test]
    fn countdown_started_at_zero_finishes_on_first_tick() {
        let mut timer = CountdownState::new();
        timer.remaining_seconds = 0;
        timer.running = true;

        assert_eq!(timer.tick(), TickOutcome::Finished);
        assert_eq!(timer.remaining_seconds, 0);
    }

    #[test]
    fn reset_returns_to_default_preset() {
        let mut timer = CountdownState::new();
        timer.apply_preset(TimerPreset::TenMinutes);
        timer.running = true;
        timer.tick();

        timer.reset();
        assert_eq!(timer.remaining_seconds, DEFAULT_TIMER_SECONDS);
        assert!(!timer.running);
        assert_eq!(timer.selected_preset, TimerPreset::FiveMinutes);
    }

    #[test]
    fn preset_keeps_running_countdown_alive() {
        let mut timer = CountdownState::new();
        timer.running = true;
        timer.tick();
        timer.apply_preset(TimerPreset::TenMinutes);

        assert!(timer.running);
        assert_eq!(timer.remaining_seconds, 600);
    }

    #[test]
    fn stopwatch_counts_up_without_bound() {
        let mut stopwatch = StopwatchState::new();
        stopwatch.running = true;
        for _ in 0..65 {
            assert_eq!(stopwatch.tick(), TickOutcome::Continue);
        }
        assert_eq!(stopwatch.elapsed_seconds, 65);
        assert_eq!(format_mmss(stopwatch.elapsed_seconds), "01:05");
    }

    #[test]
    fn mmss_minutes_do_not_wrap() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(585), "09:45");
        assert_eq!(format_mmss(3665), "61:05");
        assert_eq!(format_mmss(6000), "100:00");
    }

    #[test]
    fn presets_resolve_only_known_lengths() {
        assert_eq!(TimerPreset::from_seconds(300), Some(TimerPreset::FiveMinutes));
        assert_eq!(TimerPreset::from_seconds(600), Some(TimerPreset::TenMinutes));
        assert_eq!(TimerPreset::from_seconds(900), None);
    }
}
