//! Boot/update recovery trigger.
//!
//! Translates system lifecycle broadcasts into two idempotent requests: a
//! `RESTART_ALARMS` start for the supervisor and a suppressed launch of the
//! host UI. Vendor variants of the same broadcast collapse to one
//! [`RecoveryEvent`] through [`RECOVERY_ACTIONS`], so supporting a new variant
//! is a one-line table change.

use std::fmt;
use std::sync::Arc;

use crate::error::{LaunchTarget, PlatformError, VigilError};
use crate::health::HealthReporter;
use crate::platform::{Presentation, ServiceLauncher, UiHost};
use crate::supervisor::Command;

const RECOVERY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::recovery");

/// Semantic recovery signal delivered by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryEvent {
    /// The device finished booting.
    BootCompleted,
    /// A vendor "quick boot" power-on finished.
    QuickBootPowerOn,
    /// This package was updated or replaced.
    PackageReplaced,
}

impl fmt::Display for RecoveryEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BootCompleted => "boot_completed",
            Self::QuickBootPowerOn => "quick_boot_power_on",
            Self::PackageReplaced => "package_replaced",
        };
        formatter.write_str(label)
    }
}

/// Broadcast actions accepted as recovery triggers.
pub const RECOVERY_ACTIONS: &[(&str, RecoveryEvent)] = &[
    (
        "android.intent.action.BOOT_COMPLETED",
        RecoveryEvent::BootCompleted,
    ),
    (
        "android.intent.action.QUICKBOOT_POWERON",
        RecoveryEvent::QuickBootPowerOn,
    ),
    (
        "com.htc.intent.action.QUICKBOOT_POWERON",
        RecoveryEvent::QuickBootPowerOn,
    ),
    (
        "android.intent.action.MY_PACKAGE_REPLACED",
        RecoveryEvent::PackageReplaced,
    ),
    (
        "android.intent.action.PACKAGE_REPLACED",
        RecoveryEvent::PackageReplaced,
    ),
];

impl RecoveryEvent {
    /// Looks up a broadcast action in [`RECOVERY_ACTIONS`].
    #[must_use]
    pub fn from_action(action: &str) -> Option<Self> {
        RECOVERY_ACTIONS
            .iter()
            .find(|(candidate, _)| *candidate == action)
            .map(|(_, event)| *event)
    }
}

/// Which downstream requests the platform accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// The supervisor start request was accepted.
    pub supervisor_requested: bool,
    /// The suppressed UI launch was accepted.
    pub ui_launched: bool,
}

/// Passive listener for boot and package-update broadcasts.
pub struct RecoveryTrigger {
    launcher: Arc<dyn ServiceLauncher>,
    ui: Arc<dyn UiHost>,
    reporter: Arc<dyn HealthReporter>,
}

impl RecoveryTrigger {
    /// Builds a trigger over the supplied ports.
    #[must_use]
    pub fn new(
        launcher: Arc<dyn ServiceLauncher>,
        ui: Arc<dyn UiHost>,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            launcher,
            ui,
            reporter,
        }
    }

    /// Broadcast entry point. Returns `None` for actions outside the table.
    pub fn on_broadcast(&self, action: &str) -> Option<RecoveryReport> {
        let Some(event) = RecoveryEvent::from_action(action) else {
            self.reporter.recovery_ignored(action);
            return None;
        };
        Some(self.on_recovery_event(event))
    }

    /// Issues both recovery requests; a failure in one never skips the other.
    ///
    /// Only enqueues requests, so it returns well inside broadcast budgets.
    pub fn on_recovery_event(&self, event: RecoveryEvent) -> RecoveryReport {
        self.reporter.recovery_received(event);
        let supervisor_requested = self
            .launcher
            .request_start(Command::RestartAlarms)
            .map_err(|source| self.contain(LaunchTarget::Supervisor, source))
            .is_ok();
        let ui_launched = self
            .ui
            .launch(Presentation::Suppressed)
            .map_err(|source| self.contain(LaunchTarget::HostUi, source))
            .is_ok();
        tracing::debug!(
            target: RECOVERY_TARGET,
            recovery = %event,
            supervisor_requested,
            ui_launched,
            "recovery requests issued"
        );
        RecoveryReport {
            supervisor_requested,
            ui_launched,
        }
    }

    fn contain(&self, target: LaunchTarget, source: PlatformError) {
        self.reporter
            .condition_contained(&VigilError::from_platform(target, source));
    }
}
