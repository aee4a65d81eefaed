//! Negotiates an exemption from background-execution throttling.
//!
//! One negotiator exists per UI session and prompts at most once. The prompt
//! is fire-and-forget: its answer may arrive through
//! [`ExemptionNegotiator::on_session_result`], or never, and the core stays
//! correct in best-effort mode either way.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vigil_config::Config;

use crate::error::{LaunchTarget, VigilError};
use crate::health::{ExemptionSkip, HealthReporter};
use crate::platform::{PlatformVersion, PowerPolicy, UiHost};

const EXEMPTION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::exemption");

/// Result code the host UI reports when the user accepted a prompt.
pub const RESULT_OK: i32 = -1;

/// Shown when the exemption was granted.
pub const GRANTED_MESSAGE: &str = "Battery optimisation disabled for reliable alarms";

/// Shown when the exemption was refused or dismissed.
pub const DENIED_MESSAGE: &str = "Battery optimisation still enabled - alarms may be unreliable";

/// Where the negotiation currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExemptionStatus {
    /// Nothing has been attempted yet.
    #[default]
    NotRequested,
    /// The platform predates background throttling.
    Unsupported,
    /// The process was already exempt.
    AlreadyExempt,
    /// The prompt is showing; no answer yet.
    Pending,
    /// The user granted the exemption.
    Granted,
    /// Refused, dismissed, or the prompt could not be shown.
    BestEffort,
}

impl ExemptionStatus {
    /// Whether alarms are expected to run without throttling.
    #[must_use]
    pub const fn is_reliable(self) -> bool {
        matches!(self, Self::Unsupported | Self::AlreadyExempt | Self::Granted)
    }
}

/// Per-session exemption negotiator.
pub struct ExemptionNegotiator {
    policy: Arc<dyn PowerPolicy>,
    ui: Arc<dyn UiHost>,
    reporter: Arc<dyn HealthReporter>,
    min_platform: PlatformVersion,
    request_code: i32,
    negotiation: Mutex<Negotiation>,
}

#[derive(Debug, Default)]
struct Negotiation {
    requested: bool,
    status: ExemptionStatus,
}

impl ExemptionNegotiator {
    /// Builds a negotiator using the configured version gate and request code.
    #[must_use]
    pub fn new(
        policy: Arc<dyn PowerPolicy>,
        ui: Arc<dyn UiHost>,
        reporter: Arc<dyn HealthReporter>,
        config: &Config,
    ) -> Self {
        Self {
            policy,
            ui,
            reporter,
            min_platform: PlatformVersion(config.exemption_min_platform),
            request_code: config.exemption_request_code,
            negotiation: Mutex::new(Negotiation::default()),
        }
    }

    /// Prompts for the exemption unless unsupported, already exempt, or
    /// already attempted in this session. Never blocks and never fails.
    pub fn request_exemption(&self) -> ExemptionStatus {
        {
            let mut negotiation = self.lock();
            if negotiation.requested {
                let status = negotiation.status;
                drop(negotiation);
                self.reporter
                    .exemption_skipped(ExemptionSkip::AlreadyRequested);
                return status;
            }
            // Concurrent callers see the attempt as pending until it resolves.
            negotiation.requested = true;
            negotiation.status = ExemptionStatus::Pending;
        }

        let version = self.policy.platform_version();
        if version < self.min_platform {
            self.reporter.condition_contained(&VigilError::EnvironmentUnsupported {
                target: LaunchTarget::ExemptionPrompt,
                version: version.0,
            });
            return self.set_status(ExemptionStatus::Unsupported);
        }

        if self.policy.is_exempt() {
            self.reporter.exemption_skipped(ExemptionSkip::AlreadyExempt);
            return self.set_status(ExemptionStatus::AlreadyExempt);
        }

        let identity = self.policy.process_identity();
        match self.policy.request_exemption(&identity, self.request_code) {
            Ok(()) => {
                self.reporter.exemption_requested(&identity);
                // Already `Pending`, unless the answer arrived synchronously.
                self.status()
            }
            Err(source) => {
                self.reporter.condition_contained(&VigilError::from_platform(
                    LaunchTarget::ExemptionPrompt,
                    source,
                ));
                self.set_status(ExemptionStatus::BestEffort)
            }
        }
    }

    /// Delivery point for host UI results.
    ///
    /// Returns `None` when `request_code` belongs to another prompt.
    pub fn on_session_result(&self, request_code: i32, result_code: i32) -> Option<ExemptionStatus> {
        if request_code != self.request_code {
            tracing::debug!(
                target: EXEMPTION_TARGET,
                request_code,
                "session result belongs to another prompt"
            );
            return None;
        }
        Some(self.on_exemption_result(result_code == RESULT_OK))
    }

    /// Tells the user whether alarms are expected to be reliable.
    pub fn on_exemption_result(&self, granted: bool) -> ExemptionStatus {
        self.reporter.exemption_resolved(granted);
        if granted {
            self.ui.show_transient(GRANTED_MESSAGE);
            self.set_status(ExemptionStatus::Granted)
        } else {
            self.ui.show_transient(DENIED_MESSAGE);
            self.set_status(ExemptionStatus::BestEffort)
        }
    }

    /// Current negotiation status.
    #[must_use]
    pub fn status(&self) -> ExemptionStatus {
        self.lock().status
    }

    fn lock(&self) -> MutexGuard<'_, Negotiation> {
        self.negotiation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: ExemptionStatus) -> ExemptionStatus {
        self.lock().status = status;
        status
    }
}
