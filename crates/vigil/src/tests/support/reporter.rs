//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::sync::Mutex;
use std::time::Duration;

use crate::error::{LaunchTarget, VigilError};
use crate::health::{ExemptionSkip, HealthReporter};
use crate::platform::AnnouncementId;
use crate::recovery::RecoveryEvent;
use crate::supervisor::Command;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    SupervisorStarting(Command),
    ChannelRegistered(String),
    SupervisorForegrounded(AnnouncementId),
    ElevationDenied { retry_in: Option<Duration> },
    SupervisorDestroyed,
    RestartRequested(Command),
    Contained { target: LaunchTarget, message: String },
    RecoveryReceived(RecoveryEvent),
    RecoveryIgnored(String),
    ExemptionRequested(String),
    ExemptionSkipped(ExemptionSkip),
    ExemptionResolved(bool),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    pub fn contained(&self, target: LaunchTarget) -> bool {
        self.events().iter().any(|event| {
            matches!(event, HealthEvent::Contained { target: recorded, .. } if *recorded == target)
        })
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn supervisor_starting(&self, command: Command) {
        self.record(HealthEvent::SupervisorStarting(command));
    }

    fn channel_registered(&self, channel_id: &str) {
        self.record(HealthEvent::ChannelRegistered(channel_id.to_owned()));
    }

    fn supervisor_foregrounded(&self, id: AnnouncementId) {
        self.record(HealthEvent::SupervisorForegrounded(id));
    }

    fn elevation_denied(&self, _error: &VigilError, retry_in: Option<Duration>) {
        self.record(HealthEvent::ElevationDenied { retry_in });
    }

    fn supervisor_destroyed(&self) {
        self.record(HealthEvent::SupervisorDestroyed);
    }

    fn restart_requested(&self, command: Command) {
        self.record(HealthEvent::RestartRequested(command));
    }

    fn condition_contained(&self, error: &VigilError) {
        self.record(HealthEvent::Contained {
            target: error.target(),
            message: error.to_string(),
        });
    }

    fn recovery_received(&self, event: RecoveryEvent) {
        self.record(HealthEvent::RecoveryReceived(event));
    }

    fn recovery_ignored(&self, action: &str) {
        self.record(HealthEvent::RecoveryIgnored(action.to_owned()));
    }

    fn exemption_requested(&self, identity: &str) {
        self.record(HealthEvent::ExemptionRequested(identity.to_owned()));
    }

    fn exemption_skipped(&self, reason: ExemptionSkip) {
        self.record(HealthEvent::ExemptionSkipped(reason));
    }

    fn exemption_resolved(&self, granted: bool) {
        self.record(HealthEvent::ExemptionResolved(granted));
    }
}
