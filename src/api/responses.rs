//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::WidgetError,
    services::{Blob, MediaError},
    state::WidgetView,
};

/// Response to every widget action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub view: Option<WidgetView>,
}

impl ActionResponse {
    pub fn new(status: &str, message: String, view: Option<WidgetView>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            view,
        }
    }

    pub fn ok(message: impl Into<String>, view: WidgetView) -> Self {
        Self::new("ok", message.into(), Some(view))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message.into(), None)
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub view: WidgetView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One background blob with its ready-made CSS animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorationView {
    #[serde(flatten)]
    pub blob: Blob,
    pub animation: String,
}

impl From<Blob> for DecorationView {
    fn from(blob: Blob) -> Self {
        let animation = blob.animation();
        Self { blob, animation }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorationsResponse {
    pub viewport_width: u32,
    pub blobs: Vec<DecorationView>,
}

/// Error side of a handler, rendered as an error `ActionResponse`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<WidgetError> for ApiError {
    fn from(err: WidgetError) -> Self {
        let status = match &err {
            WidgetError::StateLock(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WidgetError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WidgetError::Media(MediaError::UnknownHandle(_)) => StatusCode::NOT_FOUND,
            WidgetError::Media(MediaError::Io { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            WidgetError::Media(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        } else {
            warn!("Request rejected: {}", self.message);
        }
        (self.status, Json(ActionResponse::error(self.message))).into_response()
    }
}
