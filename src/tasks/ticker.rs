//! Cancellable one-second tickers for the timer and stopwatch

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::{AppState, SubMode};

/// Period of every repeating task in the widget
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Interval whose first tick lands one period from now
pub fn one_second_interval() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Repeating task owned by one sub-mode.
///
/// The generation identifies this particular run: ticks are applied only
/// while the owning slot still holds the same generation, so a tick that
/// races with cancellation is dropped.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn the ticker task for `sub_mode`
    pub fn spawn(state: Arc<AppState>, sub_mode: SubMode, generation: u64) -> Self {
        let handle = tokio::spawn(sub_mode_ticker_task(state, sub_mode, generation));
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        debug!("Cancelling ticker generation {}", self.generation);
        self.handle.abort();
    }
}

async fn sub_mode_ticker_task(state: Arc<AppState>, sub_mode: SubMode, generation: u64) {
    debug!("Starting {} ticker generation {}", sub_mode, generation);

    let mut interval = one_second_interval();

    loop {
        interval.tick().await;

        match state.tick_sub_mode(sub_mode, generation) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("Failed to apply {} tick: {}", sub_mode, e);
                break;
            }
        }
    }

    debug!("{} ticker generation {} finished", sub_mode, generation);
}
