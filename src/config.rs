//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::ClockConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "liquid-clock")]
#[command(about = "A local desk widget: clock, timer, stopwatch and audio player")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// IANA time zone for the clock (defaults to the host zone)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Start the clock in 12-hour format
    #[arg(long)]
    pub twelve_hour: bool,

    /// Viewport width used for background decorations when the page sends none
    #[arg(long, default_value = "1280")]
    pub viewport_width: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Clock settings fixed at startup
    pub fn clock(&self) -> ClockConfig {
        ClockConfig::resolve(self.timezone.as_deref(), !self.twelve_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_loopback_in_24_hour_mode() {
        let config = Config::try_parse_from(["liquid-clock"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.viewport_width, 1280);
        assert!(config.clock().use_24_hour);
    }

    #[test]
    fn flags_override_clock_settings() {
        let config = Config::try_parse_from([
            "liquid-clock",
            "--timezone",
            "America/New_York",
            "--twelve-hour",
            "-v",
        ])
        .unwrap();
        let clock = config.clock();
        assert_eq!(clock.time_zone, chrono_tz::America::New_York);
        assert!(!clock.use_24_hour);
        assert_eq!(config.log_level(), "debug");
    }
}
