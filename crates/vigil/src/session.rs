//! Hooks the host UI session calls on its own lifecycle.

use std::sync::Arc;

use crate::error::{LaunchTarget, PlatformError, VigilError};
use crate::exemption::{ExemptionNegotiator, ExemptionStatus};
use crate::health::HealthReporter;
use crate::platform::{Presentation, ServiceLauncher, UiHost};
use crate::supervisor::Command;

const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

/// How the UI session was launched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchIntent {
    /// Launched by the recovery trigger rather than by the user.
    pub auto_start: bool,
}

impl From<Presentation> for LaunchIntent {
    fn from(presentation: Presentation) -> Self {
        Self {
            auto_start: presentation == Presentation::Suppressed,
        }
    }
}

/// One foreground UI session.
pub struct UiSession {
    launcher: Arc<dyn ServiceLauncher>,
    ui: Arc<dyn UiHost>,
    negotiator: ExemptionNegotiator,
    reporter: Arc<dyn HealthReporter>,
}

impl UiSession {
    /// Builds a session around a fresh negotiator.
    #[must_use]
    pub fn new(
        launcher: Arc<dyn ServiceLauncher>,
        ui: Arc<dyn UiHost>,
        negotiator: ExemptionNegotiator,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            launcher,
            ui,
            negotiator,
            reporter,
        }
    }

    /// Session creation: ensure the supervisor, negotiate once, and step
    /// aside when auto-started after a boot or update.
    pub fn on_create(&self, intent: LaunchIntent) -> ExemptionStatus {
        tracing::debug!(target: SESSION_TARGET, auto_start = intent.auto_start, "session created");
        self.ensure_supervisor();
        let status = self.negotiator.request_exemption();
        if intent.auto_start {
            if let Err(source) = self.ui.move_to_back() {
                self.contain(LaunchTarget::HostUi, source);
            }
        }
        status
    }

    /// Session resume: ensure the supervisor is running.
    pub fn on_resume(&self) {
        tracing::debug!(target: SESSION_TARGET, "session resumed");
        self.ensure_supervisor();
    }

    /// Forwards a UI result to the exemption negotiator.
    pub fn on_session_result(&self, request_code: i32, result_code: i32) -> Option<ExemptionStatus> {
        self.negotiator.on_session_result(request_code, result_code)
    }

    /// The session's exemption negotiator.
    #[must_use]
    pub const fn negotiator(&self) -> &ExemptionNegotiator {
        &self.negotiator
    }

    fn ensure_supervisor(&self) {
        if let Err(source) = self.launcher.request_start(Command::StartAlarms) {
            self.contain(LaunchTarget::Supervisor, source);
        }
    }

    fn contain(&self, target: LaunchTarget, source: PlatformError) {
        self.reporter
            .condition_contained(&VigilError::from_platform(target, source));
    }
}
