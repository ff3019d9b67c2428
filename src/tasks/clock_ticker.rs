//! Clock face refresh task

use std::sync::Arc;
use tracing::{info, warn};

use super::one_second_interval;
use crate::state::AppState;

/// Re-render the clock face once per second for the life of the process.
///
/// Late ticks are skipped rather than replayed.
pub async fn clock_ticker_task(state: Arc<AppState>) {
    info!("Starting clock ticker task");

    let mut interval = one_second_interval();

    loop {
        interval.tick().await;

        if let Err(e) = state.refresh_clock() {
            warn!("Failed to refresh clock face: {}", e);
        }
    }
}
