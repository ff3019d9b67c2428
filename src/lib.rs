//! Liquid Clock - a state-managed local desk widget
//!
//! This library holds the clock, timer/stopwatch and audio player state
//! machines, the tickers that drive them and the HTTP surface the widget
//! page talks to.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::WidgetError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
