//! Layered configuration for the vigil supervisory core.
//!
//! Values resolve from built-in defaults, then an optional configuration
//! file, then `VIGIL_*` environment variables, and finally command-line
//! flags. Loading is delegated to [`ortho_config`]; this crate only owns the
//! shape of the configuration and its defaults.

mod defaults;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use defaults::*;

/// How telemetry lines are rendered on stderr.
///
/// Parsed case-insensitively from `json` or `compact`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Flattened JSON objects, one per event, for the platform log collector.
    #[default]
    Json,
    /// Terse single-line text for a developer watching a device console.
    Compact,
}

/// Resolved configuration shared by every vigil component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "VIGIL")]
pub struct Config {
    /// `tracing` filter expression applied to the telemetry subscriber.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format of the telemetry subscriber.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Stable identifier of the announcement channel.
    #[ortho_config(default = default_channel_id())]
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    /// User-visible channel label.
    #[ortho_config(default = default_channel_name())]
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
    /// User-visible channel description.
    #[ortho_config(default = default_channel_description())]
    #[serde(default = "default_channel_description")]
    pub channel_description: String,
    /// Identifier of the liveness announcement.
    #[ortho_config(default = default_announcement_id())]
    #[serde(default = "default_announcement_id")]
    pub announcement_id: u32,
    /// Title of the liveness announcement.
    #[ortho_config(default = default_announcement_title())]
    #[serde(default = "default_announcement_title")]
    pub announcement_title: String,
    /// Body of the liveness announcement.
    #[ortho_config(default = default_announcement_text())]
    #[serde(default = "default_announcement_text")]
    pub announcement_text: String,
    /// Lowest platform version on which the exemption prompt exists.
    #[ortho_config(default = default_exemption_min_platform())]
    #[serde(default = "default_exemption_min_platform")]
    pub exemption_min_platform: u32,
    /// Request code attached to the exemption prompt.
    #[ortho_config(default = default_exemption_request_code())]
    #[serde(default = "default_exemption_request_code")]
    pub exemption_request_code: i32,
    /// Delay before the first elevation re-attempt, in milliseconds.
    #[ortho_config(default = default_elevation_retry_initial_ms())]
    #[serde(default = "default_elevation_retry_initial_ms")]
    pub elevation_retry_initial_ms: u64,
    /// Cap on the elevation re-attempt delay, in milliseconds.
    #[ortho_config(default = default_elevation_retry_max_ms())]
    #[serde(default = "default_elevation_retry_max_ms")]
    pub elevation_retry_max_ms: u64,
    /// Maximum elevation re-attempts per supervisor incarnation.
    #[ortho_config(default = default_elevation_retry_attempts())]
    #[serde(default = "default_elevation_retry_attempts")]
    pub elevation_retry_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            channel_id: default_channel_id(),
            channel_name: default_channel_name(),
            channel_description: default_channel_description(),
            announcement_id: DEFAULT_ANNOUNCEMENT_ID,
            announcement_title: default_announcement_title(),
            announcement_text: default_announcement_text(),
            exemption_min_platform: DEFAULT_EXEMPTION_MIN_PLATFORM,
            exemption_request_code: DEFAULT_EXEMPTION_REQUEST_CODE,
            elevation_retry_initial_ms: DEFAULT_ELEVATION_RETRY_INITIAL_MS,
            elevation_retry_max_ms: DEFAULT_ELEVATION_RETRY_MAX_MS,
            elevation_retry_attempts: DEFAULT_ELEVATION_RETRY_ATTEMPTS,
        }
    }
}

impl Config {
    /// Filter expression for the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for the telemetry subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Delay before the first elevation re-attempt.
    #[must_use]
    pub const fn elevation_retry_initial(&self) -> Duration {
        Duration::from_millis(self.elevation_retry_initial_ms)
    }

    /// Cap applied to every elevation re-attempt delay.
    ///
    /// Never shorter than [`Self::elevation_retry_initial`], so a
    /// misconfigured cap cannot shrink the first delay.
    #[must_use]
    pub fn elevation_retry_max(&self) -> Duration {
        Duration::from_millis(self.elevation_retry_max_ms).max(self.elevation_retry_initial())
    }

    /// Re-attempt budget per supervisor incarnation.
    #[must_use]
    pub const fn elevation_retry_attempts(&self) -> u32 {
        self.elevation_retry_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ffi::OsString;
    use std::str::FromStr;

    #[rstest]
    fn defaults_match_published_constants() {
        let config = Config::default();
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.channel_id, DEFAULT_CHANNEL_ID);
        assert_eq!(config.announcement_id, 1001);
        assert_eq!(config.exemption_min_platform, 23);
        assert_eq!(config.elevation_retry_initial(), Duration::from_secs(1));
        assert_eq!(config.elevation_retry_max(), Duration::from_secs(60));
    }

    #[rstest]
    fn bare_invocation_resolves_to_defaults() {
        let config = Config::load_from_iter(vec![OsString::from("vigil")])
            .expect("defaults alone must load");
        assert_eq!(config, Config::default());
    }

    #[rstest]
    fn retry_cap_never_undercuts_initial_delay() {
        let config = Config {
            elevation_retry_initial_ms: 5_000,
            elevation_retry_max_ms: 10,
            ..Config::default()
        };
        assert_eq!(config.elevation_retry_max(), Duration::from_secs(5));
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("COMPACT", LogFormat::Compact)]
    fn log_format_parses_case_insensitively(#[case] input: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::from_str(input).expect("format parses"), expected);
    }

    #[rstest]
    fn log_format_rejects_unknown_values() {
        assert!(LogFormat::from_str("pretty").is_err());
    }
}
