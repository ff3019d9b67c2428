//! Render model sent to the widget page
//!
//! The page never keeps state of its own: it redraws from the latest
//! `WidgetView`, and `WidgetView` is computed from `WidgetState` alone.

use serde::{Deserialize, Serialize};

use super::{
    format_mmss, ClockFace, DisplayMode, SubMode, TimerPreset, WidgetState,
};

/// Glyph names understood by the page
const GLYPH_PLAY: &str = "circle-play";
const GLYPH_PAUSE: &str = "circle-pause";
const GLYPH_RESET: &str = "arrow-rotate-left";
const GLYPH_CLOCK: &str = "clock";
const GLYPH_FLAG: &str = "flag";

/// One button of the timer/stopwatch panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    pub id: String,
    pub label: String,
    pub glyph: Option<String>,
    pub enabled: bool,
    pub active: bool,
}

impl ControlView {
    fn new(id: &str, label: &str, glyph: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            glyph: glyph.map(str::to_string),
            enabled: true,
            active: false,
        }
    }

    fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn active_if(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockView {
    #[serde(flatten)]
    pub face: ClockFace,
    pub use_24_hour: bool,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    pub sub_mode: SubMode,
    /// Shared `MM:SS` display of the active tab
    pub display: String,
    pub controls: Vec<ControlView>,
    pub timer_remaining_seconds: u64,
    pub timer_running: bool,
    pub stopwatch_elapsed_seconds: u64,
    pub stopwatch_running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioView {
    pub loaded: bool,
    pub file_name: Option<String>,
    pub media_url: Option<String>,
    pub is_playing: bool,
    pub play_label: String,
    pub play_glyph: String,
    pub play_enabled: bool,
}

/// Complete render model of the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetView {
    pub display_mode: DisplayMode,
    pub clock: ClockView,
    pub panel: PanelView,
    pub audio: AudioView,
    pub notices: Vec<String>,
}

fn start_pause(id: &str, running: bool) -> ControlView {
    if running {
        ControlView::new(id, "pause", Some(GLYPH_PAUSE))
    } else {
        ControlView::new(id, "start", Some(GLYPH_PLAY))
    }
}

fn panel_controls(state: &WidgetState) -> Vec<ControlView> {
    let panel = &state.panel;
    match panel.sub_mode {
        SubMode::Timer => {
            let selected = panel.timer.selected_preset;
            vec![
                ControlView::new("preset5", "5:00", Some(GLYPH_CLOCK))
                    .active_if(selected == TimerPreset::FiveMinutes),
                ControlView::new("preset10", "10:00", None)
                    .active_if(selected == TimerPreset::TenMinutes),
                start_pause("startPauseTimer", panel.timer.running),
                ControlView::new("resetTimer", "reset", Some(GLYPH_RESET)),
            ]
        }
        SubMode::Stopwatch => vec![
            start_pause("startPauseStopwatch", panel.stopwatch.running),
            ControlView::new("resetStopwatch", "reset", Some(GLYPH_RESET)),
            // Laps are not recorded
            ControlView::new("lapStopwatch", "lap", Some(GLYPH_FLAG)).disabled(),
        ],
    }
}

impl WidgetView {
    pub fn from_state(state: &WidgetState) -> Self {
        let panel = &state.panel;
        let audio = &state.audio;

        Self {
            display_mode: panel.display_mode,
            clock: ClockView {
                face: state.clock_face.clone(),
                use_24_hour: state.clock.use_24_hour,
                time_zone: state.clock.time_zone.name().to_string(),
            },
            panel: PanelView {
                sub_mode: panel.sub_mode,
                display: format_mmss(panel.active_seconds()),
                controls: panel_controls(state),
                timer_remaining_seconds: panel.timer.remaining_seconds,
                timer_running: panel.timer.running,
                stopwatch_elapsed_seconds: panel.stopwatch.elapsed_seconds,
                stopwatch_running: panel.stopwatch.running,
            },
            audio: AudioView {
                loaded: audio.is_loaded(),
                file_name: audio.file_name.clone(),
                media_url: audio.handle.map(|h| h.url()),
                is_playing: audio.is_playing,
                play_label: audio.play_label().to_string(),
                play_glyph: if audio.is_playing { GLYPH_PAUSE } else { GLYPH_PLAY }.to_string(),
                play_enabled: audio.is_loaded(),
            },
            notices: state.notices.clone(),
        }
    }
}
