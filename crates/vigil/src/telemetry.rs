//! Structured telemetry initialisation.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use vigil_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned once telemetry is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber was already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use; later calls are no-ops.
///
/// Every [`crate::Vigil`] built in the process shares one subscriber, so a
/// host adapter that bootstraps more than once keeps the first format and
/// filter. A filter that fails to parse is reported before anything is
/// installed, and the next call may try again with a corrected config.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for a malformed `log_filter` and
/// [`TelemetryError::Subscriber`] when another crate already installed a
/// global subscriber.
///
/// # Examples
///
/// ```rust
/// use vigil::telemetry;
/// use vigil_config::{Config, LogFormat};
///
/// # fn main() -> Result<(), vigil::TelemetryError> {
/// let config = Config {
///     log_filter: "vigil=debug".to_owned(),
///     log_format: LogFormat::Compact,
///     ..Config::default()
/// };
/// let first = telemetry::initialise(&config)?;
///
/// // Later bootstraps reuse the installed subscriber.
/// let second = telemetry::initialise(&Config::default())?;
/// drop((first, second));
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |env_filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_writer(io::stderr)
            // No colour codes when stderr is piped to the platform log.
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_malformed_filter() {
        let config = Config {
            log_filter: "vigil=notalevel".to_owned(),
            ..Config::default()
        };
        let error = install_subscriber(&config).expect_err("filter must be rejected");
        assert!(matches!(error, TelemetryError::Filter(_)));
    }

    #[rstest]
    fn repeated_initialisation_is_idempotent() {
        let config = Config {
            log_filter: "vigil=debug".to_owned(),
            log_format: LogFormat::Compact,
            ..Config::default()
        };
        initialise(&config).expect("first initialisation succeeds");
        initialise(&Config::default()).expect("later initialisation is a no-op");
    }
}
