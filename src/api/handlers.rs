//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    Json,
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info, warn};

use crate::{
    services::seed_decorations,
    state::{AppState, PanelOutcome, SubMode},
};
use super::responses::{
    ActionResponse, ApiError, DecorationsResponse, HealthResponse, StatusResponse,
};

type ApiResult = Result<Json<ActionResponse>, ApiError>;

const WIDGET_PAGE: &str = include_str!("../../assets/widget.html");

/// Panel actions on hidden controls, or that change nothing, still succeed
/// but say so
fn panel_response(action: impl Into<String>, outcome: PanelOutcome) -> Json<ActionResponse> {
    let action = action.into();
    let message = if outcome.applied {
        action
    } else {
        format!("{} ignored: no change", action)
    };
    Json(ActionResponse::ok(message, outcome.view))
}

/// Handle GET / - Serve the widget page
pub async fn index_handler() -> Html<&'static str> {
    Html(WIDGET_PAGE)
}

/// Handle GET /status - Return the current view and server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let view = state.view()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        view,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream a view after every state change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("View subscriber connected");
    let rx = state.view_tx.subscribe();

    // First item is the current view, then one per change
    let views = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let view = rx.borrow_and_update().clone();
        let event = match Event::default().event("view").json_data(&view) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode view event: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };
        Some((Ok(event), (rx, false)))
    });

    Sse::new(views).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
pub struct DecorationQuery {
    pub width: Option<u32>,
}

/// Handle GET /decorations - Seed background blobs for a viewport width
pub async fn decorations_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DecorationQuery>,
) -> Json<DecorationsResponse> {
    let viewport_width = query.width.unwrap_or(state.viewport_width);
    let blobs = seed_decorations(viewport_width, &mut rand::rng());
    debug!("Seeded {} blobs for width {}", blobs.len(), viewport_width);

    Json(DecorationsResponse {
        viewport_width,
        blobs: blobs.into_iter().map(Into::into).collect(),
    })
}

/// Handle POST /clock/format - Flip 12/24-hour display
pub async fn clock_format_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let view = state.toggle_hour_format()?;
    Ok(Json(ActionResponse::ok("Hour format toggled", view)))
}

/// Handle POST /mode - Flip between clock and timer/stopwatch
pub async fn mode_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let outcome = state.toggle_display_mode()?;
    Ok(panel_response("Display mode toggled", outcome))
}

/// Handle POST /submode/:name - Select the timer or stopwatch tab
pub async fn sub_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult {
    let sub_mode: SubMode = name
        .parse()
        .map_err(|e: String| ApiError::new(StatusCode::BAD_REQUEST, e))?;
    let outcome = state.select_sub_mode(sub_mode)?;
    Ok(panel_response(format!("{} selected", sub_mode), outcome))
}

/// Handle POST /timer/start-pause
pub async fn timer_start_pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let outcome = state.start_pause(SubMode::Timer)?;
    Ok(panel_response("Timer start/pause", outcome))
}

/// Handle POST /timer/reset
pub async fn timer_reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let outcome = state.reset(SubMode::Timer)?;
    Ok(panel_response("Timer reset", outcome))
}

/// Handle POST /timer/preset/:seconds
pub async fn timer_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(seconds): Path<u64>,
) -> ApiResult {
    let outcome = state.apply_preset(seconds)?;
    Ok(panel_response(format!("Timer preset {}s", seconds), outcome))
}

/// Handle POST /stopwatch/start-pause
pub async fn stopwatch_start_pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let outcome = state.start_pause(SubMode::Stopwatch)?;
    Ok(panel_response("Stopwatch start/pause", outcome))
}

/// Handle POST /stopwatch/reset
pub async fn stopwatch_reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let outcome = state.reset(SubMode::Stopwatch)?;
    Ok(panel_response("Stopwatch reset", outcome))
}

/// Handle POST /stopwatch/lap - The lap control is always disabled
pub async fn stopwatch_lap_handler() -> ApiError {
    ApiError::new(StatusCode::CONFLICT, "Lap recording is not available")
}

#[derive(Debug, Deserialize)]
pub struct LoadAudioRequest {
    #[serde(default)]
    pub path: String,
}

/// Handle POST /audio/load - Bind a local file to the player
pub async fn audio_load_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoadAudioRequest>,
) -> ApiResult {
    let view = state.load_audio(&request.path).await?;
    let message = match &view.audio.file_name {
        Some(name) => format!("Loaded {}", name),
        None => "No file chosen".to_string(),
    };
    Ok(Json(ActionResponse::ok(message, view)))
}

/// Handle POST /audio/toggle - Play or pause
pub async fn audio_toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let view = state.toggle_play_pause().await?;
    let message = if view.audio.is_playing { "Playing" } else { "Paused" };
    Ok(Json(ActionResponse::ok(message, view)))
}

/// Handle POST /audio/ended - Playback reached the end
pub async fn audio_ended_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let view = state.playback_ended()?;
    Ok(Json(ActionResponse::ok("Playback ended", view)))
}

#[derive(Debug, Deserialize)]
pub struct PlayFailedRequest {
    pub reason: Option<String>,
}

/// Handle POST /audio/play-failed - The page could not start playback
pub async fn audio_play_failed_handler(
    State(state): State<Arc<AppState>>,
    request: Option<Json<PlayFailedRequest>>,
) -> ApiResult {
    let reason = request.and_then(|Json(request)| request.reason);
    let view = state.playback_failed(reason.as_deref())?;
    Ok(Json(ActionResponse::ok("Playback failed", view)))
}

/// Handle GET /media/:id - Stream the file behind a live handle.
///
/// Range requests are answered with partial content so the page can seek.
pub async fn media_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let path = state
        .media_path(id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Unknown media handle: {}", id)))?;
    info!("Serving {}", path.display());

    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

/// Handle DELETE /notices - Dismiss alerts
pub async fn clear_notices_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let view = state.clear_notices()?;
    Ok(Json(ActionResponse::ok("Notices cleared", view)))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
