//! Default values shared by [`crate::Config`] and its serde layer.

use crate::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Stable identifier of the low-importance announcement channel.
pub const DEFAULT_CHANNEL_ID: &str = "alarm_service_channel";

/// User-visible label of the announcement channel.
pub const DEFAULT_CHANNEL_NAME: &str = "Alarm background service";

/// User-visible description of the announcement channel.
pub const DEFAULT_CHANNEL_DESCRIPTION: &str = "Keeps alarms active in the background";

/// Identifier under which the liveness announcement is published.
pub const DEFAULT_ANNOUNCEMENT_ID: u32 = 1001;

/// Title shown on the liveness announcement.
pub const DEFAULT_ANNOUNCEMENT_TITLE: &str = "Alarms";

/// Body shown on the liveness announcement.
pub const DEFAULT_ANNOUNCEMENT_TEXT: &str = "Alarms are active in background";

/// First platform version that throttles background execution.
pub const DEFAULT_EXEMPTION_MIN_PLATFORM: u32 = 23;

/// Request code used to correlate the exemption prompt with its result.
pub const DEFAULT_EXEMPTION_REQUEST_CODE: i32 = 1001;

/// Delay before the first elevation re-attempt, in milliseconds.
pub const DEFAULT_ELEVATION_RETRY_INITIAL_MS: u64 = 1_000;

/// Upper bound on the elevation re-attempt delay, in milliseconds.
pub const DEFAULT_ELEVATION_RETRY_MAX_MS: u64 = 60_000;

/// Number of elevation re-attempts allowed per supervisor incarnation.
pub const DEFAULT_ELEVATION_RETRY_ATTEMPTS: u32 = 5;

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned channel identifier for serde defaults.
#[must_use]
pub fn default_channel_id() -> String {
    DEFAULT_CHANNEL_ID.to_owned()
}

/// Owned channel name for serde defaults.
#[must_use]
pub fn default_channel_name() -> String {
    DEFAULT_CHANNEL_NAME.to_owned()
}

/// Owned channel description for serde defaults.
#[must_use]
pub fn default_channel_description() -> String {
    DEFAULT_CHANNEL_DESCRIPTION.to_owned()
}

/// Announcement identifier for serde defaults.
#[must_use]
pub const fn default_announcement_id() -> u32 {
    DEFAULT_ANNOUNCEMENT_ID
}

/// Owned announcement title for serde defaults.
#[must_use]
pub fn default_announcement_title() -> String {
    DEFAULT_ANNOUNCEMENT_TITLE.to_owned()
}

/// Owned announcement body for serde defaults.
#[must_use]
pub fn default_announcement_text() -> String {
    DEFAULT_ANNOUNCEMENT_TEXT.to_owned()
}

/// Minimum throttling-capable platform version for serde defaults.
#[must_use]
pub const fn default_exemption_min_platform() -> u32 {
    DEFAULT_EXEMPTION_MIN_PLATFORM
}

/// Exemption request code for serde defaults.
#[must_use]
pub const fn default_exemption_request_code() -> i32 {
    DEFAULT_EXEMPTION_REQUEST_CODE
}

/// Initial elevation backoff for serde defaults.
#[must_use]
pub const fn default_elevation_retry_initial_ms() -> u64 {
    DEFAULT_ELEVATION_RETRY_INITIAL_MS
}

/// Elevation backoff cap for serde defaults.
#[must_use]
pub const fn default_elevation_retry_max_ms() -> u64 {
    DEFAULT_ELEVATION_RETRY_MAX_MS
}

/// Elevation attempt budget for serde defaults.
#[must_use]
pub const fn default_elevation_retry_attempts() -> u32 {
    DEFAULT_ELEVATION_RETRY_ATTEMPTS
}
