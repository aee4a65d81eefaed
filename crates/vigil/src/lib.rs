//! Supervisory core that keeps an alarm service alive on a hostile host.
//!
//! Three collaborating components make up the core:
//!
//! - [`LivenessSupervisor`] owns the background task's lifecycle. It elevates
//!   itself to a foreground-visible task with a single low-importance
//!   announcement and re-issues its own start when the platform destroys it.
//! - [`RecoveryTrigger`] listens for boot and package-update broadcasts and
//!   restarts the supervisor alongside a suppressed launch of the host UI.
//! - [`ExemptionNegotiator`] asks once per UI session to be exempted from
//!   background throttling and tolerates any answer, including none.
//!
//! All OS interaction goes through the traits in [`platform`]. Failures are
//! contained where they happen and reported through [`HealthReporter`]; no
//! lifecycle callback returns an error to the platform.
//!
//! [`bootstrap_with`] loads configuration, installs telemetry, and wires the
//! components around a host adapter implementing [`Platform`].

mod bootstrap;
pub mod error;
pub mod exemption;
mod health;
pub mod platform;
pub mod recovery;
pub mod session;
pub mod supervisor;
pub mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, Vigil, bootstrap_with,
    bootstrap_with_registry,
};
pub use error::{LaunchTarget, PlatformError, PlatformErrorKind, VigilError};
pub use exemption::{ExemptionNegotiator, ExemptionStatus};
pub use health::{ExemptionSkip, HealthReporter, StructuredHealthReporter};
pub use platform::Platform;
pub use recovery::{RecoveryEvent, RecoveryReport, RecoveryTrigger};
pub use session::{LaunchIntent, UiSession};
pub use supervisor::{Command, LivenessSupervisor, ServiceState};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
