//! Main application state management

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    ClockConfig, ClockFace, PanelState, SubMode, TickOutcome, TickerCommand, TimerPreset,
    WidgetState, WidgetView,
};
use crate::{
    error::{Result, WidgetError},
    services::{MediaHandle, MediaHost},
    tasks::Ticker,
};

/// Alert shown when the host refuses to start playback
pub const PLAYBACK_FAILED_NOTICE: &str = "Could not play audio. Please try again.";

/// Result of a panel action
#[derive(Debug, Clone)]
pub struct PanelOutcome {
    pub view: WidgetView,
    /// False when the control was hidden or the action changed nothing
    pub applied: bool,
}

/// Widget state plus the tickers owned by each sub-mode.
///
/// Kept behind a single lock so a running flag and its ticker always change
/// together.
#[derive(Debug, Default)]
struct LiveState {
    widget: WidgetState,
    timer_ticker: Option<Ticker>,
    stopwatch_ticker: Option<Ticker>,
    next_generation: u64,
}

impl LiveState {
    fn ticker_slot(&mut self, sub_mode: SubMode) -> &mut Option<Ticker> {
        match sub_mode {
            SubMode::Timer => &mut self.timer_ticker,
            SubMode::Stopwatch => &mut self.stopwatch_ticker,
        }
    }
}

/// Shared runtime state of the widget
pub struct AppState {
    live: Mutex<LiveState>,
    media: Arc<dyn MediaHost>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Width used for decorations when the page does not send one
    pub viewport_width: u32,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Latest view, republished after every change
    pub view_tx: watch::Sender<WidgetView>,
    /// Keep the receiver alive to prevent channel closure
    pub _view_rx: watch::Receiver<WidgetView>,
}

impl AppState {
    /// Create the state with a freshly rendered clock face
    pub fn new(
        clock: ClockConfig,
        media: Arc<dyn MediaHost>,
        host: String,
        port: u16,
        viewport_width: u32,
    ) -> Self {
        let mut widget = WidgetState::new(clock);
        widget.clock_face = ClockFace::render(Utc::now(), &widget.clock);
        let (view_tx, view_rx) = watch::channel(WidgetView::from_state(&widget));

        Self {
            live: Mutex::new(LiveState {
                widget,
                ..LiveState::default()
            }),
            media,
            start_time: Instant::now(),
            port,
            host,
            viewport_width,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            view_tx,
            _view_rx: view_rx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LiveState>> {
        self.live.lock().map_err(WidgetError::lock)
    }

    /// Notify view subscribers
    fn publish(&self, view: &WidgetView) {
        if let Err(e) = self.view_tx.send(view.clone()) {
            warn!("Failed to publish widget view: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Render, publish and return the view of `live`
    fn commit(&self, live: &LiveState) -> WidgetView {
        let view = WidgetView::from_state(&live.widget);
        self.publish(&view);
        view
    }

    /// Run a panel transition and carry out the ticker command it returns.
    ///
    /// Transitions that leave the panel untouched are neither published nor
    /// recorded as the last action.
    fn update_panel<F>(self: &Arc<Self>, action: &str, transition: F) -> Result<PanelOutcome>
    where
        F: FnOnce(&mut PanelState) -> Option<TickerCommand>,
    {
        let mut live = self.lock()?;
        let before = live.widget.panel.clone();
        let command = transition(&mut live.widget.panel);
        if let Some(command) = command {
            self.execute(&mut live, command);
        }
        let applied = live.widget.panel != before;
        if !applied {
            debug!("{} left the panel unchanged", action);
            return Ok(PanelOutcome {
                view: WidgetView::from_state(&live.widget),
                applied,
            });
        }
        let view = self.commit(&live);
        drop(live);

        self.record_action(action);
        Ok(PanelOutcome { view, applied })
    }

    fn execute(self: &Arc<Self>, live: &mut LiveState, command: TickerCommand) {
        match command {
            TickerCommand::Start(sub_mode) => {
                live.next_generation += 1;
                let generation = live.next_generation;
                let ticker = Ticker::spawn(Arc::clone(self), sub_mode, generation);
                if let Some(stale) = live.ticker_slot(sub_mode).replace(ticker) {
                    stale.cancel();
                }
                info!("Started {} (ticker generation {})", sub_mode, generation);
            }
            TickerCommand::Cancel(sub_mode) => {
                if let Some(ticker) = live.ticker_slot(sub_mode).take() {
                    ticker.cancel();
                }
                info!("Stopped {}", sub_mode);
            }
        }
    }

    /// Apply one tick from the ticker of `sub_mode`.
    ///
    /// Returns whether the ticker should keep running.
    pub fn tick_sub_mode(&self, sub_mode: SubMode, generation: u64) -> Result<bool> {
        let mut live = self.lock()?;
        let current = live.ticker_slot(sub_mode).as_ref().map(Ticker::generation);
        if current != Some(generation) {
            debug!("Ignoring stale {} tick from generation {}", sub_mode, generation);
            return Ok(false);
        }

        let keep_running = match live.widget.panel.tick(sub_mode) {
            TickOutcome::Continue => true,
            TickOutcome::Finished => {
                info!("{} reached zero, stopping", sub_mode);
                false
            }
            TickOutcome::Idle => false,
        };
        if !keep_running {
            // The task ends on its own; dropping the handle detaches it
            live.ticker_slot(sub_mode).take();
        }
        debug!(
            "{} tick: {}s",
            sub_mode,
            live.widget.panel.active_seconds()
        );
        self.commit(&live);
        Ok(keep_running)
    }

    /// Flip between the clock and the timer/stopwatch panel
    pub fn toggle_display_mode(self: &Arc<Self>) -> Result<PanelOutcome> {
        info!("Toggling display mode");
        self.update_panel("toggle-mode", PanelState::toggle_display_mode)
    }

    pub fn select_sub_mode(self: &Arc<Self>, sub_mode: SubMode) -> Result<PanelOutcome> {
        info!("Selecting {} tab", sub_mode);
        self.update_panel(&format!("select-{}", sub_mode), |panel| {
            panel.select_sub_mode(sub_mode)
        })
    }

    pub fn start_pause(self: &Arc<Self>, sub_mode: SubMode) -> Result<PanelOutcome> {
        self.update_panel(&format!("{}-start-pause", sub_mode), |panel| {
            panel.start_pause(sub_mode)
        })
    }

    pub fn reset(self: &Arc<Self>, sub_mode: SubMode) -> Result<PanelOutcome> {
        info!("Resetting {}", sub_mode);
        self.update_panel(&format!("{}-reset", sub_mode), |panel| panel.reset(sub_mode))
    }

    /// Jump the countdown to a preset length in seconds
    pub fn apply_preset(self: &Arc<Self>, seconds: u64) -> Result<PanelOutcome> {
        let preset = TimerPreset::from_seconds(seconds)
            .ok_or_else(|| WidgetError::InvalidInput(format!("Unsupported preset: {}s", seconds)))?;
        self.update_panel(&format!("preset-{}", seconds), |panel| {
            if panel.apply_preset(preset) {
                info!("Timer preset set to {}s", seconds);
            }
            None
        })
    }

    /// Flip 12/24-hour display and re-render at once
    pub fn toggle_hour_format(&self) -> Result<WidgetView> {
        let mut live = self.lock()?;
        live.widget.clock.toggle_hour_format();
        info!(
            "Clock switched to {}-hour format",
            if live.widget.clock.use_24_hour { 24 } else { 12 }
        );
        live.widget.clock_face = ClockFace::render(Utc::now(), &live.widget.clock);
        let view = self.commit(&live);
        drop(live);

        self.record_action("toggle-hour-format");
        Ok(view)
    }

    /// Re-render the clock face for the current instant
    pub fn refresh_clock(&self) -> Result<()> {
        let mut live = self.lock()?;
        let face = ClockFace::render(Utc::now(), &live.widget.clock);
        if face != live.widget.clock_face {
            live.widget.clock_face = face;
            self.commit(&live);
        }
        Ok(())
    }

    /// Bind a local file to the player.
    ///
    /// An empty path means nothing was picked and changes nothing. The old
    /// handle is released before the new one is created.
    pub async fn load_audio(&self, path: &str) -> Result<WidgetView> {
        let path = path.trim();
        if path.is_empty() {
            debug!("No audio file chosen, ignoring load");
            return self.view();
        }
        let path = Path::new(path);
        self.media.probe(path).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut live = self.lock()?;
        if let Some(previous) = live.widget.audio.handle.take() {
            self.media.release(previous);
        }
        let handle = self.media.create_handle(path);
        live.widget.audio.replace(handle, file_name.clone());
        let view = self.commit(&live);
        drop(live);

        info!("Loaded audio file {}", file_name);
        self.record_action("audio-load");
        Ok(view)
    }

    /// Pause when playing, otherwise ask the host to start playback.
    ///
    /// A refused start is reported as a notice and leaves the player paused.
    pub async fn toggle_play_pause(&self) -> Result<WidgetView> {
        let handle = {
            let mut live = self.lock()?;
            let Some(handle) = live.widget.audio.handle else {
                return Ok(WidgetView::from_state(&live.widget));
            };
            if live.widget.audio.is_playing {
                self.media.pause(handle);
                live.widget.audio.mark_paused();
                info!("Audio paused");
                let view = self.commit(&live);
                drop(live);
                self.record_action("audio-pause");
                return Ok(view);
            }
            handle
        };

        // Lock is not held while the host works
        let outcome = self.media.play(handle).await;

        let mut live = self.lock()?;
        if live.widget.audio.handle != Some(handle) {
            debug!("Audio file changed during play request, discarding outcome");
            return Ok(WidgetView::from_state(&live.widget));
        }
        match outcome {
            Ok(()) => {
                live.widget.audio.mark_playing();
                info!("Audio playing");
            }
            Err(e) => {
                warn!("Playback failed: {}", e);
                live.widget.add_notice(PLAYBACK_FAILED_NOTICE);
            }
        }
        let view = self.commit(&live);
        drop(live);

        self.record_action("audio-play");
        Ok(view)
    }

    /// The page could not start playback after the host accepted it.
    ///
    /// Same outcome as a refused start: paused, with a notice.
    pub fn playback_failed(&self, reason: Option<&str>) -> Result<WidgetView> {
        let mut live = self.lock()?;
        if !live.widget.audio.is_loaded() {
            return Ok(WidgetView::from_state(&live.widget));
        }
        warn!("Playback failed: {}", reason.unwrap_or("no reason given"));
        live.widget.audio.mark_paused();
        live.widget.add_notice(PLAYBACK_FAILED_NOTICE);
        let view = self.commit(&live);
        drop(live);

        self.record_action("audio-play-failed");
        Ok(view)
    }

    /// Media reached its end
    pub fn playback_ended(&self) -> Result<WidgetView> {
        let mut live = self.lock()?;
        if live.widget.audio.is_playing {
            info!("Audio playback ended");
        }
        live.widget.audio.mark_paused();
        Ok(self.commit(&live))
    }

    pub fn clear_notices(&self) -> Result<WidgetView> {
        let mut live = self.lock()?;
        live.widget.clear_notices();
        Ok(self.commit(&live))
    }

    /// File behind a live media id
    pub fn media_path(&self, id: u64) -> Option<PathBuf> {
        self.media.resolve(MediaHandle::new(id))
    }

    pub fn live_media_handles(&self) -> usize {
        self.media.live_handles()
    }

    /// Current view
    pub fn view(&self) -> Result<WidgetView> {
        let live = self.lock()?;
        Ok(WidgetView::from_state(&live.widget))
    }

    /// Stop both sub-mode tickers
    pub fn shutdown(&self) {
        match self.lock() {
            Ok(mut live) => {
                for sub_mode in [SubMode::Timer, SubMode::Stopwatch] {
                    if let Some(ticker) = live.ticker_slot(sub_mode).take() {
                        ticker.cancel();
                    }
                }
            }
            Err(e) => warn!("Failed to stop tickers: {}", e),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        match (hours, minutes) {
            (0, 0) => format!("{}s", seconds),
            (0, _) => format!("{}m {}s", minutes, seconds),
            _ => format!("{}h {}m {}s", hours, minutes, seconds),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{LocalMediaHost, MediaError};
    use axum::async_trait;
    use std::{io::Write, time::Duration};

    fn state_with(media: Arc<dyn MediaHost>) -> Arc<AppState> {
        Arc::new(AppState::new(
            ClockConfig::default(),
            media,
            "127.0.0.1".to_string(),
            0,
            1280,
        ))
    }

    fn local_state() -> Arc<AppState> {
        state_with(Arc::new(LocalMediaHost::new()))
    }

    fn audio_file(dir: &tempfile::TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really audio").unwrap();
        path.to_string_lossy().into_owned()
    }

    /// Host that refuses every play request
    struct BlockedHost(LocalMediaHost);

    #[async_trait]
    impl MediaHost for BlockedHost {
        async fn probe(&self, path: &Path) -> std::result::Result<(), MediaError> {
            self.0.probe(path).await
        }
        fn create_handle(&self, path: &Path) -> MediaHandle {
            self.0.create_handle(path)
        }
        fn release(&self, handle: MediaHandle) {
            self.0.release(handle)
        }
        fn resolve(&self, handle: MediaHandle) -> Option<PathBuf> {
            self.0.resolve(handle)
        }
        async fn play(&self, _handle: MediaHandle) -> std::result::Result<(), MediaError> {
            Err(MediaError::Refused("autoplay blocked".to_string()))
        }
        fn pause(&self, handle: MediaHandle) {
            self.0.pause(handle)
        }
        fn live_handles(&self) -> usize {
            self.0.live_handles()
        }
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn ten_minute_countdown_reads_nine_forty_five() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        state.apply_preset(600).unwrap();
        state.start_pause(SubMode::Timer).unwrap();

        sleep_ms(15_500).await;

        let view = state.view().unwrap();
        assert_eq!(view.panel.display, "09:45");
        assert!(view.panel.timer_running);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_stops_itself_at_zero() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        {
            let mut live = state.lock().unwrap();
            live.widget.panel.timer.remaining_seconds = 3;
        }
        state.start_pause(SubMode::Timer).unwrap();

        sleep_ms(10_500).await;

        let view = state.view().unwrap();
        assert_eq!(view.panel.timer_remaining_seconds, 0);
        assert!(!view.panel.timer_running);
        assert_eq!(view.panel.controls[2].label, "start");
        assert!(state.lock().unwrap().timer_ticker.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stopwatch_counts_sixty_five_seconds() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        state.select_sub_mode(SubMode::Stopwatch).unwrap();
        state.start_pause(SubMode::Stopwatch).unwrap();

        sleep_ms(65_500).await;

        assert_eq!(state.view().unwrap().panel.display, "01:05");
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_panel_cancels_ticker_and_keeps_value() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        state.start_pause(SubMode::Timer).unwrap();
        sleep_ms(4_500).await;

        state.toggle_display_mode().unwrap();
        sleep_ms(5_000).await;

        let view = state.view().unwrap();
        assert_eq!(view.panel.timer_remaining_seconds, 296);
        assert!(!view.panel.timer_running);
        assert!(state.lock().unwrap().timer_ticker.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn switching_tabs_pauses_previous_counter() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        state.select_sub_mode(SubMode::Stopwatch).unwrap();
        state.start_pause(SubMode::Stopwatch).unwrap();
        sleep_ms(3_500).await;

        let view = state.select_sub_mode(SubMode::Timer).unwrap().view;
        assert_eq!(view.panel.display, "05:00");
        sleep_ms(3_000).await;

        let view = state.select_sub_mode(SubMode::Stopwatch).unwrap().view;
        assert_eq!(view.panel.display, "00:03");
        assert!(!view.panel.stopwatch_running);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_ticks_are_ignored() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        state.start_pause(SubMode::Timer).unwrap();
        let generation = state.lock().unwrap().timer_ticker.as_ref().unwrap().generation();

        state.start_pause(SubMode::Timer).unwrap();
        assert!(!state.tick_sub_mode(SubMode::Timer, generation).unwrap());
        assert_eq!(state.view().unwrap().panel.timer_remaining_seconds, 300);
    }

    #[tokio::test]
    async fn loading_second_file_releases_first_handle() {
        let dir = tempfile::tempdir().unwrap();
        let state = local_state();

        let first = state.load_audio(&audio_file(&dir, "one.mp3")).await.unwrap();
        let first_url = first.audio.media_url.unwrap();
        assert_eq!(state.live_media_handles(), 1);

        let second = state.load_audio(&audio_file(&dir, "two.mp3")).await.unwrap();
        assert_eq!(state.live_media_handles(), 1);
        assert_ne!(second.audio.media_url.as_deref(), Some(first_url.as_str()));
        assert_eq!(second.audio.file_name.as_deref(), Some("two.mp3"));
        assert!(second.audio.play_enabled);
        assert!(!second.audio.is_playing);
    }

    #[tokio::test]
    async fn empty_selection_changes_nothing() {
        let state = local_state();
        let view = state.load_audio("  ").await.unwrap();
        assert!(!view.audio.play_enabled);
        assert_eq!(state.live_media_handles(), 0);

        let view = state.toggle_play_pause().await.unwrap();
        assert!(!view.audio.is_playing);
    }

    #[tokio::test]
    async fn bad_path_keeps_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = local_state();
        state.load_audio(&audio_file(&dir, "one.mp3")).await.unwrap();

        let missing = dir.path().join("missing.mp3");
        let err = state.load_audio(&missing.to_string_lossy()).await.unwrap_err();
        assert!(matches!(err, WidgetError::Media(MediaError::NotFound { .. })));

        let view = state.view().unwrap();
        assert_eq!(view.audio.file_name.as_deref(), Some("one.mp3"));
        assert_eq!(state.live_media_handles(), 1);
    }

    #[tokio::test]
    async fn play_pause_and_end_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let state = local_state();
        state.load_audio(&audio_file(&dir, "one.mp3")).await.unwrap();

        let view = state.toggle_play_pause().await.unwrap();
        assert!(view.audio.is_playing);
        assert_eq!(view.audio.play_label, "pause");

        let view = state.toggle_play_pause().await.unwrap();
        assert!(!view.audio.is_playing);

        state.toggle_play_pause().await.unwrap();
        let view = state.playback_ended().unwrap();
        assert!(!view.audio.is_playing);
        assert_eq!(view.audio.play_label, "play");
    }

    #[tokio::test]
    async fn refused_playback_raises_notice_and_stays_paused() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(Arc::new(BlockedHost(LocalMediaHost::new())));
        state.load_audio(&audio_file(&dir, "one.mp3")).await.unwrap();

        let view = state.toggle_play_pause().await.unwrap();
        assert!(!view.audio.is_playing);
        assert_eq!(view.notices, vec![PLAYBACK_FAILED_NOTICE.to_string()]);

        let view = state.clear_notices().unwrap();
        assert!(view.notices.is_empty());
    }

    #[tokio::test]
    async fn page_playback_failure_reverts_to_paused() {
        let dir = tempfile::tempdir().unwrap();
        let state = local_state();

        let view = state.playback_failed(Some("NotAllowedError")).unwrap();
        assert!(view.notices.is_empty());

        state.load_audio(&audio_file(&dir, "one.mp3")).await.unwrap();
        assert!(state.toggle_play_pause().await.unwrap().audio.is_playing);

        let view = state.playback_failed(Some("NotAllowedError")).unwrap();
        assert!(!view.audio.is_playing);
        assert_eq!(view.audio.play_label, "play");
        assert_eq!(view.notices, vec![PLAYBACK_FAILED_NOTICE.to_string()]);
        assert_eq!(state.get_last_action().0.as_deref(), Some("audio-play-failed"));
    }

    #[tokio::test]
    async fn ignored_panel_actions_are_not_recorded() {
        let state = local_state();
        let mut rx = state.view_tx.subscribe();
        rx.borrow_and_update();

        let outcome = state.apply_preset(600).unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.view.panel.timer_remaining_seconds, 300);
        assert_eq!(state.get_last_action().0, None);
        assert!(!rx.has_changed().unwrap());

        let outcome = state.toggle_display_mode().unwrap();
        assert!(outcome.applied);
        let outcome = state.select_sub_mode(SubMode::Timer).unwrap();
        assert!(!outcome.applied);
        assert_eq!(state.get_last_action().0.as_deref(), Some("toggle-mode"));
    }

    #[tokio::test]
    async fn hour_toggle_republishes_view() {
        let state = local_state();
        let mut rx = state.view_tx.subscribe();
        rx.borrow_and_update();

        let view = state.toggle_hour_format().unwrap();
        assert!(!view.clock.use_24_hour);
        assert!(rx.has_changed().unwrap());
        assert_eq!(state.get_last_action().0.as_deref(), Some("toggle-hour-format"));
    }

    #[tokio::test]
    async fn unsupported_preset_is_rejected() {
        let state = local_state();
        state.toggle_display_mode().unwrap();
        assert!(matches!(
            state.apply_preset(900),
            Err(WidgetError::InvalidInput(_))
        ));
    }
}
