//! State management module
//!
//! This module contains the widget state, the pure transitions that drive it
//! and the shared `AppState` that owns it at runtime.

pub mod app_state;
pub mod audio_state;
pub mod clock_state;
pub mod panel_state;
pub mod timer_state;
pub mod view;
pub mod widget_state;

// Re-export main types
pub use app_state::{AppState, PanelOutcome};
pub use audio_state::AudioSession;
pub use clock_state::{ClockConfig, ClockFace};
pub use panel_state::{DisplayMode, PanelState, SubMode, TickerCommand};
pub use timer_state::{
    format_mmss, CountdownState, StopwatchState, TickOutcome, TimerPreset, DEFAULT_TIMER_SECONDS,
};
pub use view::WidgetView;
pub use widget_state::WidgetState;
