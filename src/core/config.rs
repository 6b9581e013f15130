//! # Configuration
//!
//! Environment-based configuration for the reminder daemon. Values are read
//! once at startup; a `.env` file is honored when present (loaded by the
//! binaries via `dotenvy` before this runs).
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Separate REMINDER_WINDOW_SECS from the tick interval
//! - 1.0.0: Initial env-var configuration

use anyhow::{bail, Context, Result};

/// Default polling interval for the reminder loop, in seconds.
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 60;

/// Default lead time before a reservation starts, in minutes.
pub const DEFAULT_LEAD_TIME_MINUTES: i64 = 5;

/// Runtime configuration for the reminder daemon.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite reservations database
    pub database_path: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Seconds between scheduler ticks
    pub tick_interval_secs: u64,
    /// Minutes before a reservation's start time at which the reminder fires
    pub lead_time_minutes: i64,
    /// Seconds the fire window stays open once the target instant passes.
    /// Defaults to the tick interval; widen it to give failed sends more
    /// retry margin before a reservation counts as missed.
    pub fire_window_secs: i64,
    /// Mail API endpoint the mailer posts messages to
    pub mail_api_url: String,
    /// Bearer token for the mail API
    pub mail_api_token: String,
    /// From address for outgoing reminders
    pub mail_sender: String,
}

impl Config {
    /// Builds a Config from environment variables.
    ///
    /// `MAIL_API_URL`, `MAIL_API_TOKEN` and `MAIL_SENDER` are required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self> {
        // A zero tick would panic tokio's interval, and a non-positive
        // window classifies everything as missed; both are rejected here.
        let tick_interval_secs =
            parse_env_positive_u64("REMINDER_TICK_SECS", DEFAULT_TICK_INTERVAL_SECS)?;
        let lead_time_minutes = parse_env_i64("REMINDER_LEAD_MINUTES", DEFAULT_LEAD_TIME_MINUTES)?;
        // The window defaults to one tick so reference behavior is preserved
        // when the variable is unset.
        let fire_window_secs =
            parse_env_positive_i64("REMINDER_WINDOW_SECS", tick_interval_secs as i64)?;

        Ok(Config {
            database_path: env_or("DATABASE_PATH", "reservations.db"),
            log_level: env_or("LOG_LEVEL", "info"),
            tick_interval_secs,
            lead_time_minutes,
            fire_window_secs,
            mail_api_url: require_env("MAIL_API_URL")?,
            mail_api_token: require_env("MAIL_API_TOKEN")?,
            mail_sender: require_env("MAIL_SENDER")?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn parse_env_positive_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => bail!("{name} must be a positive integer, got '{raw}'"),
        },
        Err(_) => Ok(default),
    }
}

fn parse_env_positive_i64(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<i64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => bail!("{name} must be a positive integer, got '{raw}'"),
        },
        Err(_) => Ok(default),
    }
}

fn parse_env_i64(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("{name} must be an integer, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var reads use unique names per test so parallel execution stays safe.

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("COURTSIDE_TEST_UNSET_1", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_env_positive_u64_default_when_unset() {
        assert_eq!(parse_env_positive_u64("COURTSIDE_TEST_UNSET_2", 60).unwrap(), 60);
    }

    #[test]
    fn test_parse_env_positive_u64_rejects_garbage() {
        std::env::set_var("COURTSIDE_TEST_GARBAGE_3", "soon");
        assert!(parse_env_positive_u64("COURTSIDE_TEST_GARBAGE_3", 60).is_err());
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        std::env::set_var("COURTSIDE_TEST_ZERO_6", "0");
        assert!(parse_env_positive_u64("COURTSIDE_TEST_ZERO_6", 60).is_err());
    }

    #[test]
    fn test_nonpositive_window_rejected() {
        std::env::set_var("COURTSIDE_TEST_ZERO_7", "0");
        assert!(parse_env_positive_i64("COURTSIDE_TEST_ZERO_7", 60).is_err());

        std::env::set_var("COURTSIDE_TEST_NEG_8", "-30");
        assert!(parse_env_positive_i64("COURTSIDE_TEST_NEG_8", 60).is_err());
    }

    #[test]
    fn test_parse_env_i64_reads_value() {
        std::env::set_var("COURTSIDE_TEST_VALUE_4", "120");
        assert_eq!(parse_env_i64("COURTSIDE_TEST_VALUE_4", 5).unwrap(), 120);
    }

    #[test]
    fn test_require_env_missing() {
        let err = require_env("COURTSIDE_TEST_UNSET_5").unwrap_err();
        assert!(err.to_string().contains("COURTSIDE_TEST_UNSET_5"));
    }
}
