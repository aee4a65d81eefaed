//! Structured health reporting for supervisory lifecycle events.

use std::sync::Arc;
use std::time::Duration;

use crate::error::VigilError;
use crate::platform::AnnouncementId;
use crate::recovery::RecoveryEvent;
use crate::supervisor::Command;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// A start request reached the supervisor.
    fn supervisor_starting(&self, command: Command);

    /// The announcement channel was created in this process.
    fn channel_registered(&self, channel_id: &str);

    /// The supervisor elevated and published its announcement.
    fn supervisor_foregrounded(&self, id: AnnouncementId);

    /// Elevation was refused; `retry_in` is `None` once retries are spent.
    fn elevation_denied(&self, error: &VigilError, retry_in: Option<Duration>);

    /// The OS tore the supervisor down.
    fn supervisor_destroyed(&self);

    /// The supervisor re-issued its own start request.
    fn restart_requested(&self, command: Command);

    /// A failure or unsupported capability was contained at a boundary.
    fn condition_contained(&self, error: &VigilError);

    /// A recovery broadcast was accepted.
    fn recovery_received(&self, event: RecoveryEvent);

    /// A broadcast outside the recovery table was ignored.
    fn recovery_ignored(&self, action: &str);

    /// The exemption prompt was issued.
    fn exemption_requested(&self, identity: &str);

    /// The exemption prompt was not issued.
    fn exemption_skipped(&self, reason: ExemptionSkip);

    /// The user answered the exemption prompt.
    fn exemption_resolved(&self, granted: bool);
}

/// Reasons the exemption prompt is not shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptionSkip {
    /// The process is already exempt.
    AlreadyExempt,
    /// The prompt was already issued in this UI session.
    AlreadyRequested,
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn supervisor_starting(&self, command: Command) {
        (**self).supervisor_starting(command);
    }

    fn channel_registered(&self, channel_id: &str) {
        (**self).channel_registered(channel_id);
    }

    fn supervisor_foregrounded(&self, id: AnnouncementId) {
        (**self).supervisor_foregrounded(id);
    }

    fn elevation_denied(&self, error: &VigilError, retry_in: Option<Duration>) {
        (**self).elevation_denied(error, retry_in);
    }

    fn supervisor_destroyed(&self) {
        (**self).supervisor_destroyed();
    }

    fn restart_requested(&self, command: Command) {
        (**self).restart_requested(command);
    }

    fn condition_contained(&self, error: &VigilError) {
        (**self).condition_contained(error);
    }

    fn recovery_received(&self, event: RecoveryEvent) {
        (**self).recovery_received(event);
    }

    fn recovery_ignored(&self, action: &str) {
        (**self).recovery_ignored(action);
    }

    fn exemption_requested(&self, identity: &str) {
        (**self).exemption_requested(identity);
    }

    fn exemption_skipped(&self, reason: ExemptionSkip) {
        (**self).exemption_skipped(reason);
    }

    fn exemption_resolved(&self, granted: bool) {
        (**self).exemption_resolved(granted);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn supervisor_starting(&self, command: Command) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "supervisor_starting",
            command = %command,
            "start request received"
        );
    }

    fn channel_registered(&self, channel_id: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "channel_registered",
            channel = channel_id,
            "announcement channel registered"
        );
    }

    fn supervisor_foregrounded(&self, id: AnnouncementId) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "supervisor_foregrounded",
            announcement = %id,
            "supervisor elevated to foreground"
        );
    }

    fn elevation_denied(&self, error: &VigilError, retry_in: Option<Duration>) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "elevation_denied",
            error = %error,
            retry_in_ms = retry_in.map(|delay| u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)),
            "foreground elevation refused; continuing in best-effort mode"
        );
    }

    fn supervisor_destroyed(&self) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "supervisor_destroyed",
            "supervisor destroyed by the platform"
        );
    }

    fn restart_requested(&self, command: Command) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "restart_requested",
            command = %command,
            "supervisor re-issued its own start"
        );
    }

    fn condition_contained(&self, error: &VigilError) {
        if let VigilError::EnvironmentUnsupported { .. } = error {
            tracing::debug!(
                target: HEALTH_TARGET,
                event = "capability_unavailable",
                error = %error,
                "capability absent on this platform; skipping"
            );
            return;
        }
        tracing::error!(
            target: HEALTH_TARGET,
            event = "failure_contained",
            target_request = %error.target(),
            error = %error,
            "downstream request failed"
        );
    }

    fn recovery_received(&self, event: RecoveryEvent) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "recovery_received",
            recovery = %event,
            "recovery broadcast accepted"
        );
    }

    fn recovery_ignored(&self, action: &str) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "recovery_ignored",
            action,
            "broadcast is not a recovery trigger"
        );
    }

    fn exemption_requested(&self, identity: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "exemption_requested",
            identity,
            "exemption prompt issued"
        );
    }

    fn exemption_skipped(&self, reason: ExemptionSkip) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "exemption_skipped",
            reason = ?reason,
            "exemption prompt not issued"
        );
    }

    fn exemption_resolved(&self, granted: bool) {
        if granted {
            tracing::info!(
                target: HEALTH_TARGET,
                event = "exemption_resolved",
                granted,
                "background throttling exemption granted"
            );
        } else {
            tracing::warn!(
                target: HEALTH_TARGET,
                event = "exemption_resolved",
                granted,
                "exemption denied; alarms run in best-effort mode"
            );
        }
    }
}
