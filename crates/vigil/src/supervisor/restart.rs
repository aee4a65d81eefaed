//! The `Destroyed → Starting` edge of the supervisor state machine.

use crate::error::{LaunchTarget, VigilError};
use crate::health::HealthReporter;
use crate::platform::ServiceLauncher;

use super::command::Command;
use super::state::{LifecycleEvent, ServiceState};

/// Re-issues a `RESTART_SERVICE` start request from a destroyed supervisor.
///
/// Returns `Starting` once the request is accepted by the platform. A failed
/// request is reported and leaves the supervisor `Destroyed`; it is never
/// propagated into the termination callback.
pub fn reissue_start(
    launcher: &dyn ServiceLauncher,
    reporter: &dyn HealthReporter,
) -> ServiceState {
    let destroyed = ServiceState::Destroyed;
    match launcher.request_start(Command::RestartService) {
        Ok(()) => {
            reporter.restart_requested(Command::RestartService);
            destroyed.on(LifecycleEvent::RestartIssued)
        }
        Err(source) => {
            reporter.condition_contained(&VigilError::from_platform(LaunchTarget::Supervisor, source));
            destroyed
        }
    }
}
