//! Error types for widget operations

use thiserror::Error;

use crate::services::MediaError;

/// Failures surfaced by `AppState` operations
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Shared state mutex was poisoned
    #[error("Failed to lock widget state: {0}")]
    StateLock(String),

    /// Request named something the widget does not offer
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Media host rejected a file or handle
    #[error(transparent)]
    Media(#[from] MediaError),
}

impl WidgetError {
    pub fn lock(err: impl std::fmt::Display) -> Self {
        Self::StateLock(err.to_string())
    }
}

/// Result type alias using `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;
