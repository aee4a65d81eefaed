//! Ports to the host operating system.
//!
//! The core never calls the OS directly. A host adapter implements these
//! traits over the real service, broadcast, and power-management APIs; tests
//! implement them with recording doubles.

use std::fmt;
use std::time::Instant;

use crate::error::PlatformError;
use crate::supervisor::Command;

/// Importance requested for the announcement channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    /// Shown without sound or heads-up presentation.
    Low,
}

/// Attributes of the process-wide announcement channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Stable identifier; registration is keyed on it.
    pub id: String,
    /// User-visible label.
    pub name: String,
    /// User-visible description.
    pub description: String,
    /// Requested importance.
    pub importance: Importance,
    /// Whether the launcher badge is shown.
    pub show_badge: bool,
    /// Whether the channel plays a sound.
    pub silent: bool,
}

/// Identifier passed alongside a published announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnouncementId(pub u32);

impl fmt::Display for AnnouncementId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// The persistent, low-importance liveness indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Channel the announcement is posted on.
    pub channel_id: String,
    /// Title line.
    pub title: String,
    /// Body line.
    pub text: String,
    /// The user cannot swipe it away.
    pub ongoing: bool,
    /// Posted without sound or vibration.
    pub silent: bool,
    /// Tapping it brings the host UI forward.
    pub opens_host_ui: bool,
}

/// How the host UI should present itself when launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Normal launch that takes input focus.
    Interactive,
    /// Initialise without gaining input focus.
    Suppressed,
}

/// Platform API level reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlatformVersion(pub u32);

impl fmt::Display for PlatformVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// OS service-lifecycle calls used by the supervisor.
pub trait ForegroundHost: Send + Sync {
    /// Creates the announcement channel. Creating an existing channel is a no-op.
    fn register_channel(&self, channel: &ChannelSpec) -> Result<(), PlatformError>;

    /// Elevates the calling task to foreground-visible and publishes `announcement`.
    fn start_foreground(
        &self,
        id: AnnouncementId,
        announcement: &Announcement,
    ) -> Result<(), PlatformError>;

    /// Drops foreground status and retracts the announcement.
    fn stop_foreground(&self) -> Result<(), PlatformError>;
}

/// Sends start requests to the supervisor through the OS.
pub trait ServiceLauncher: Send + Sync {
    /// Asks the OS to deliver `command` to the supervisor's start callback.
    fn request_start(&self, command: Command) -> Result<(), PlatformError>;
}

/// The external host UI session.
pub trait UiHost: Send + Sync {
    /// Brings the UI up with the requested presentation.
    fn launch(&self, presentation: Presentation) -> Result<(), PlatformError>;

    /// Moves the UI task behind whatever currently has focus.
    fn move_to_back(&self) -> Result<(), PlatformError>;

    /// Shows a transient, non-blocking message.
    fn show_transient(&self, message: &str);
}

/// Power-management queries and the exemption prompt.
pub trait PowerPolicy: Send + Sync {
    /// Version of the running platform.
    fn platform_version(&self) -> PlatformVersion;

    /// Whether the process is already exempt from background throttling.
    fn is_exempt(&self) -> bool;

    /// Identity of the running process, used to key the exemption.
    fn process_identity(&self) -> String;

    /// Issues the interactive exemption prompt. Must not block on the answer.
    fn request_exemption(&self, identity: &str, request_code: i32) -> Result<(), PlatformError>;
}

/// Monotonic time source.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Everything a host adapter provides.
pub trait Platform: ForegroundHost + ServiceLauncher + UiHost + PowerPolicy + Clock {}

impl<T> Platform for T where T: ForegroundHost + ServiceLauncher + UiHost + PowerPolicy + Clock {}
