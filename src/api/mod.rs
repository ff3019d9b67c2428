//! HTTP API module
//!
//! This module contains the widget page, the action endpoints and the view
//! stream the page renders from.

pub mod handlers;
pub mod origin;
pub mod responses;

use std::sync::Arc;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/decorations", get(decorations_handler))
        // Clock and mode switch
        .route("/clock/format", post(clock_format_handler))
        .route("/mode", post(mode_handler))
        .route("/submode/:name", post(sub_mode_handler))
        // Timer / stopwatch
        .route("/timer/start-pause", post(timer_start_pause_handler))
        .route("/timer/reset", post(timer_reset_handler))
        .route("/timer/preset/:seconds", post(timer_preset_handler))
        .route("/stopwatch/start-pause", post(stopwatch_start_pause_handler))
        .route("/stopwatch/reset", post(stopwatch_reset_handler))
        .route("/stopwatch/lap", post(stopwatch_lap_handler))
        // Audio player
        .route("/audio/load", post(audio_load_handler))
        .route("/audio/toggle", post(audio_toggle_handler))
        .route("/audio/ended", post(audio_ended_handler))
        .route("/audio/play-failed", post(audio_play_failed_handler))
        .route("/media/:id", get(media_handler))
        .route("/notices", delete(clear_notices_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(origin::reject_cross_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
