//! Wires configuration, telemetry, and the three components together.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use vigil_config::Config;

use crate::exemption::ExemptionNegotiator;
use crate::health::HealthReporter;
use crate::platform::{Clock, ForegroundHost, Platform, PowerPolicy, ServiceLauncher, UiHost};
use crate::recovery::RecoveryTrigger;
use crate::session::UiSession;
use crate::supervisor::{ChannelRegistry, LivenessSupervisor, SupervisorPorts, SupervisorSettings};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps a prebuilt configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

#[derive(Clone)]
struct Ports {
    host: Arc<dyn ForegroundHost>,
    launcher: Arc<dyn ServiceLauncher>,
    ui: Arc<dyn UiHost>,
    policy: Arc<dyn PowerPolicy>,
    clock: Arc<dyn Clock>,
}

impl Ports {
    fn from_platform<P>(platform: &Arc<P>) -> Self
    where
        P: Platform + 'static,
    {
        Self {
            host: Arc::clone(platform) as Arc<dyn ForegroundHost>,
            launcher: Arc::clone(platform) as Arc<dyn ServiceLauncher>,
            ui: Arc::clone(platform) as Arc<dyn UiHost>,
            policy: Arc::clone(platform) as Arc<dyn PowerPolicy>,
            clock: Arc::clone(platform) as Arc<dyn Clock>,
        }
    }
}

/// The wired supervisory core.
pub struct Vigil {
    config: Config,
    telemetry: TelemetryHandle,
    ports: Ports,
    reporter: Arc<dyn HealthReporter>,
    supervisor: Arc<LivenessSupervisor>,
    recovery: RecoveryTrigger,
}

impl Vigil {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// The liveness supervisor; the host routes start and destroy callbacks here.
    #[must_use]
    pub fn supervisor(&self) -> Arc<LivenessSupervisor> {
        Arc::clone(&self.supervisor)
    }

    /// The boot/update recovery trigger; the host routes broadcasts here.
    #[must_use]
    pub const fn recovery(&self) -> &RecoveryTrigger {
        &self.recovery
    }

    /// Builds the hooks for a newly created UI session.
    #[must_use]
    pub fn new_session(&self) -> UiSession {
        let negotiator = ExemptionNegotiator::new(
            Arc::clone(&self.ports.policy),
            Arc::clone(&self.ports.ui),
            Arc::clone(&self.reporter),
            &self.config,
        );
        UiSession::new(
            Arc::clone(&self.ports.launcher),
            Arc::clone(&self.ports.ui),
            negotiator,
            Arc::clone(&self.reporter),
        )
    }
}

/// Bootstraps against the process-wide channel registry.
pub fn bootstrap_with<P>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    platform: Arc<P>,
) -> Result<Vigil, BootstrapError>
where
    P: Platform + 'static,
{
    bootstrap_with_registry(loader, reporter, platform, ChannelRegistry::global())
}

/// Bootstraps with an explicit channel registry.
pub fn bootstrap_with_registry<P>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    platform: Arc<P>,
    channels: Arc<ChannelRegistry>,
) -> Result<Vigil, BootstrapError>
where
    P: Platform + 'static,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let ports = Ports::from_platform(&platform);
    let supervisor = Arc::new(LivenessSupervisor::new(
        SupervisorPorts {
            host: Arc::clone(&ports.host),
            launcher: Arc::clone(&ports.launcher),
            clock: Arc::clone(&ports.clock),
            channels,
        },
        SupervisorSettings::from_config(&config),
        Arc::clone(&reporter),
    ));
    let recovery = RecoveryTrigger::new(
        Arc::clone(&ports.launcher),
        Arc::clone(&ports.ui),
        Arc::clone(&reporter),
    );

    Ok(Vigil {
        config,
        telemetry,
        ports,
        reporter,
        supervisor,
        recovery,
    })
}
