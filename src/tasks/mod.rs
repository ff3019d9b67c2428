//! Background tasks module
//!
//! This module contains the repeating tasks that drive the clock face and
//! the timer/stopwatch counters.

pub mod clock_ticker;
pub mod ticker;

// Re-export main items
pub use clock_ticker::clock_ticker_task;
pub use ticker::{one_second_interval, Ticker, TICK_PERIOD};
