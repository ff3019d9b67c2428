//! Clock configuration and face rendering

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Time zone and hour format of the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    pub time_zone: Tz,
    pub use_24_hour: bool,
}

impl ClockConfig {
    pub fn new(time_zone: Tz, use_24_hour: bool) -> Self {
        Self {
            time_zone,
            use_24_hour,
        }
    }

    /// Resolve the zone from an explicit name, then the host, then UTC
    pub fn resolve(requested: Option<&str>, use_24_hour: bool) -> Self {
        let time_zone = requested
            .and_then(|name| match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(e) => {
                    warn!("Ignoring unknown time zone {}: {}", name, e);
                    None
                }
            })
            .or_else(host_time_zone)
            .unwrap_or(Tz::UTC);
        debug!("Clock time zone resolved to {}", time_zone.name());
        Self::new(time_zone, use_24_hour)
    }

    pub fn toggle_hour_format(&mut self) {
        self.use_24_hour = !self.use_24_hour;
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new(Tz::UTC, true)
    }
}

fn host_time_zone() -> Option<Tz> {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse().ok(),
        Err(e) => {
            warn!("Could not read host time zone: {}", e);
            None
        }
    }
}

/// Rendered clock text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockFace {
    /// `HH:MM` or `HH MM` on odd seconds
    pub time: String,
    /// `YYYY.MM.DD WEEKDAY`
    pub date: String,
}

impl ClockFace {
    /// Render an instant in the configured zone and format
    pub fn render(now: DateTime<Utc>, config: &ClockConfig) -> Self {
        Self::render_local(&now.with_timezone(&config.time_zone), config.use_24_hour)
    }

    fn render_local<T: TimeZone>(local: &DateTime<T>, use_24_hour: bool) -> Self {
        let hour = if use_24_hour {
            local.hour()
        } else {
            local.hour12().1
        };
        let separator = if local.second() % 2 == 0 { ':' } else { ' ' };
        let weekday = local.weekday().to_string().to_uppercase();

        Self {
            time: format!("{:02}{}{:02}", hour, separator, local.minute()),
            date: format!(
                "{}.{:02}.{:02} {}",
                local.year(),
                local.month(),
                local.day(),
                weekday
            ),
        }
    }
}
