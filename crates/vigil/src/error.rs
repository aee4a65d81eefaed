//! Error taxonomy for the supervisory core.
//!
//! Port implementations report [`PlatformError`]. Components classify those
//! into [`VigilError`] at the boundary where they occur and hand them to the
//! [`HealthReporter`](crate::HealthReporter); neither type ever escapes a
//! lifecycle callback.

use std::fmt;

use thiserror::Error;

/// Broad classification of a failed platform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformErrorKind {
    /// The operating system refused the call on policy grounds.
    PolicyDenied,
    /// The capability does not exist on this platform version.
    Unsupported,
    /// The call raised for any other reason.
    Failed,
}

impl fmt::Display for PlatformErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PolicyDenied => "policy denied",
            Self::Unsupported => "unsupported",
            Self::Failed => "failed",
        };
        formatter.write_str(label)
    }
}

/// Error returned by a platform port.
#[derive(Debug, Error)]
#[error("{operation} {kind}: {message}")]
pub struct PlatformError {
    /// Classification of the failure.
    pub kind: PlatformErrorKind,
    operation: &'static str,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PlatformError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(kind: PlatformErrorKind, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a policy refusal.
    #[must_use]
    pub fn policy_denied(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::PolicyDenied, operation, message)
    }

    /// Shorthand for a generic failure.
    #[must_use]
    pub fn failed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(PlatformErrorKind::Failed, operation, message)
    }

    /// Attaches the error raised by the underlying platform binding.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Name of the platform operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Downstream request a component was issuing when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchTarget {
    /// Registration of the announcement channel.
    Channel,
    /// Elevation of the supervisor to a foreground-visible task.
    Elevation,
    /// A start request addressed to the supervisor.
    Supervisor,
    /// Launch or re-presentation of the host UI.
    HostUi,
    /// The interactive exemption prompt.
    ExemptionPrompt,
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Channel => "announcement channel",
            Self::Elevation => "foreground elevation",
            Self::Supervisor => "supervisor start",
            Self::HostUi => "host ui",
            Self::ExemptionPrompt => "exemption prompt",
        };
        formatter.write_str(label)
    }
}

/// Conditions the core contains, logs, and never re-throws.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Foreground elevation or exemption was refused by OS policy.
    #[error("{target} refused by platform policy: {source}")]
    PolicyDenied {
        /// Request that was refused.
        target: LaunchTarget,
        /// Platform error describing the refusal.
        #[source]
        source: PlatformError,
    },
    /// The capability is absent on this platform version.
    #[error("{target} unavailable on platform version {version}")]
    EnvironmentUnsupported {
        /// Request that cannot be issued.
        target: LaunchTarget,
        /// Platform version that lacks the capability.
        version: u32,
    },
    /// An OS call to start a task or the host UI raised.
    #[error("{target} launch failed: {source}")]
    DownstreamLaunchFailed {
        /// Request that failed.
        target: LaunchTarget,
        /// Platform error raised by the call.
        #[source]
        source: PlatformError,
    },
}

impl VigilError {
    /// Classifies a port failure raised while issuing `target`.
    #[must_use]
    pub fn from_platform(target: LaunchTarget, source: PlatformError) -> Self {
        match source.kind {
            PlatformErrorKind::PolicyDenied => Self::PolicyDenied { target, source },
            PlatformErrorKind::Unsupported | PlatformErrorKind::Failed => {
                Self::DownstreamLaunchFailed { target, source }
            }
        }
    }

    /// Request the condition relates to.
    #[must_use]
    pub const fn target(&self) -> LaunchTarget {
        match self {
            Self::PolicyDenied { target, .. }
            | Self::EnvironmentUnsupported { target, .. }
            | Self::DownstreamLaunchFailed { target, .. } => *target,
        }
    }

    /// Returns `true` when the platform refused on policy grounds.
    #[must_use]
    pub const fn is_policy_denial(&self) -> bool {
        matches!(self, Self::PolicyDenied { .. })
    }
}
