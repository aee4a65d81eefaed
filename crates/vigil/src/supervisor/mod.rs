//! Liveness supervisor: keeps the alarm task elevated and respawns it.
//!
//! The supervisor owns [`ServiceState`]. Every start callback converges on
//! `Foregrounded` regardless of its [`Command`]; repeated or concurrent starts
//! publish the announcement at most once. Involuntary termination retracts the
//! announcement, moves to `Destroyed`, and immediately re-issues a
//! `RESTART_SERVICE` start through [`restart::reissue_start`].
//!
//! Policy refusal of the elevation is not fatal. The supervisor keeps running
//! in best-effort mode and re-attempts on a bounded backoff, either when the
//! host calls [`LivenessSupervisor::retry_elevation`] or on a later start.

mod backoff;
mod channel;
mod command;
pub mod restart;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use vigil_config::Config;

use crate::error::{LaunchTarget, VigilError};
use crate::health::HealthReporter;
use crate::platform::{
    Announcement, AnnouncementId, ChannelSpec, Clock, ForegroundHost, Importance,
    ServiceLauncher,
};

pub use backoff::ElevationBackoff;
pub use channel::ChannelRegistry;
pub use command::Command;
pub use state::{LifecycleEvent, ServiceState};

const SUPERVISOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::supervisor");

/// Platform collaborators the supervisor drives.
#[derive(Clone)]
pub struct SupervisorPorts {
    /// Foreground elevation and channel registration.
    pub host: Arc<dyn ForegroundHost>,
    /// Start requests addressed back to the supervisor.
    pub launcher: Arc<dyn ServiceLauncher>,
    /// Time source for the elevation backoff.
    pub clock: Arc<dyn Clock>,
    /// Process-wide channel registry.
    pub channels: Arc<ChannelRegistry>,
}

/// Static description of what the supervisor publishes.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    /// Channel the announcement is posted on.
    pub channel: ChannelSpec,
    /// Identifier of the announcement.
    pub announcement_id: AnnouncementId,
    /// The announcement itself.
    pub announcement: Announcement,
    /// Re-attempt schedule after policy denials.
    pub backoff: ElevationBackoff,
}

impl SupervisorSettings {
    /// Derives settings from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let channel = ChannelSpec {
            id: config.channel_id.clone(),
            name: config.channel_name.clone(),
            description: config.channel_description.clone(),
            importance: Importance::Low,
            show_badge: false,
            silent: true,
        };
        let announcement = Announcement {
            channel_id: config.channel_id.clone(),
            title: config.announcement_title.clone(),
            text: config.announcement_text.clone(),
            ongoing: true,
            silent: true,
            opens_host_ui: true,
        };
        Self {
            channel,
            announcement_id: AnnouncementId(config.announcement_id),
            announcement,
            backoff: ElevationBackoff::from_config(config),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: ServiceState,
    announced: bool,
    elevating: bool,
    incarnation: u64,
    backoff: ElevationBackoff,
}

/// Owner of the long-running alarm task's lifecycle.
///
/// The state lock is never held across a platform call, so a host that
/// delivers callbacks synchronously from inside one cannot deadlock it.
pub struct LivenessSupervisor {
    ports: SupervisorPorts,
    channel: ChannelSpec,
    announcement_id: AnnouncementId,
    announcement: Announcement,
    reporter: Arc<dyn HealthReporter>,
    inner: Mutex<Inner>,
}

impl LivenessSupervisor {
    /// Builds a stopped supervisor.
    #[must_use]
    pub fn new(
        ports: SupervisorPorts,
        settings: SupervisorSettings,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        let SupervisorSettings {
            channel,
            announcement_id,
            announcement,
            backoff,
        } = settings;
        Self {
            ports,
            channel,
            announcement_id,
            announcement,
            reporter,
            inner: Mutex::new(Inner {
                state: ServiceState::Stopped,
                announced: false,
                elevating: false,
                incarnation: 0,
                backoff,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start callback. Idempotent for every [`Command`].
    ///
    /// Registers the channel once per process, then elevates and publishes
    /// the announcement unless it is already outstanding or an elevation is
    /// in flight. While a denied elevation is waiting on its backoff the call
    /// leaves the supervisor in `Starting` without contacting the platform.
    pub fn start(&self, command: Command) -> ServiceState {
        self.reporter.supervisor_starting(command);
        let mut guard = self.lock();
        if guard.state == ServiceState::Foregrounded || guard.elevating {
            return guard.state;
        }
        let now = self.ports.clock.now();
        if guard.state == ServiceState::Starting
            && (guard.backoff.is_waiting(now) || guard.backoff.is_exhausted())
        {
            tracing::debug!(
                target: SUPERVISOR_TARGET,
                command = %command,
                "elevation deferred by backoff"
            );
            return guard.state;
        }
        guard.state = guard.state.on(LifecycleEvent::StartRequested);
        self.elevate(guard)
    }

    /// Re-attempts a denied elevation once its backoff has elapsed.
    ///
    /// Hosts schedule this from [`Self::next_elevation_attempt`]; calls made
    /// early, or in any state but `Starting`, do nothing.
    pub fn retry_elevation(&self) -> ServiceState {
        let guard = self.lock();
        let now = self.ports.clock.now();
        if guard.state == ServiceState::Starting
            && !guard.elevating
            && guard.backoff.is_due(now)
        {
            return self.elevate(guard);
        }
        guard.state
    }

    /// Involuntary-termination callback, invoked only by the platform.
    ///
    /// Enters `Destroyed`, retracts the announcement, then re-issues its own
    /// start before returning. An elevation still in flight belongs to the
    /// destroyed incarnation and its outcome is discarded.
    pub fn stop(&self) -> ServiceState {
        let was_announced = {
            let mut guard = self.lock();
            let was_announced = guard.announced;
            guard.announced = false;
            guard.elevating = false;
            guard.incarnation = guard.incarnation.wrapping_add(1);
            guard.backoff.reset();
            guard.state = guard.state.on(LifecycleEvent::Destroyed);
            was_announced
        };
        if was_announced {
            if let Err(source) = self.ports.host.stop_foreground() {
                self.reporter
                    .condition_contained(&VigilError::from_platform(LaunchTarget::Elevation, source));
            }
        }
        self.reporter.supervisor_destroyed();

        let next = restart::reissue_start(self.ports.launcher.as_ref(), self.reporter.as_ref());
        let mut guard = self.lock();
        if guard.state == ServiceState::Destroyed {
            guard.state = next;
        }
        guard.state
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ServiceState {
        self.lock().state
    }

    /// Whether the supervisor is `Starting` or `Foregrounded`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Whether the liveness announcement is currently published.
    #[must_use]
    pub fn has_announcement(&self) -> bool {
        self.lock().announced
    }

    /// When the next elevation re-attempt is due, if one is scheduled.
    #[must_use]
    pub fn next_elevation_attempt(&self) -> Option<Instant> {
        self.lock().backoff.next_attempt()
    }

    fn ensure_channel(&self) {
        match self
            .ports
            .channels
            .ensure_registered(self.ports.host.as_ref(), &self.channel)
        {
            Ok(true) => self.reporter.channel_registered(&self.channel.id),
            Ok(false) => {}
            Err(source) => self
                .reporter
                .condition_contained(&VigilError::from_platform(LaunchTarget::Channel, source)),
        }
    }

    /// Marks an elevation in flight, releases the lock for the platform
    /// calls, and applies the outcome if the incarnation survived them.
    fn elevate(&self, mut guard: MutexGuard<'_, Inner>) -> ServiceState {
        guard.elevating = true;
        let incarnation = guard.incarnation;
        drop(guard);

        self.ensure_channel();
        let outcome = self
            .ports
            .host
            .start_foreground(self.announcement_id, &self.announcement);

        let now = self.ports.clock.now();
        let mut inner = self.lock();
        if inner.incarnation != incarnation {
            return inner.state;
        }
        inner.elevating = false;
        match outcome {
            Ok(()) => {
                inner.announced = true;
                inner.backoff.reset();
                inner.state = inner.state.on(LifecycleEvent::Elevated);
                self.reporter.supervisor_foregrounded(self.announcement_id);
            }
            Err(source) => {
                let error = VigilError::from_platform(LaunchTarget::Elevation, source);
                let retry_in = inner.backoff.record_denial(now);
                self.reporter.elevation_denied(&error, retry_in);
            }
        }
        inner.state
    }
}
