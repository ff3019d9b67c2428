//! Aggregate widget state

use super::{AudioSession, ClockConfig, ClockFace, PanelState};

/// Everything the widget page renders from
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    pub clock: ClockConfig,
    /// Face from the latest clock tick
    pub clock_face: ClockFace,
    pub panel: PanelState,
    pub audio: AudioSession,
    /// User-facing alerts, oldest first
    pub notices: Vec<String>,
}

impl WidgetState {
    pub fn new(clock: ClockConfig) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn add_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
    }

    /// Drop all notices, returning how many were cleared
    pub fn clear_notices(&mut self) -> usize {
        let count = self.notices.len();
        self.notices.clear();
        if count > 0 {
            tracing::info!("Cleared {} notices", count);
        }
        count
    }
}
