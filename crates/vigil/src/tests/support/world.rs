//! Shared world for the behavioural suites.
//!
//! The world plays the platform's role: start requests and UI launches the
//! core issues are queued on the [`RecordingPlatform`] and delivered back into
//! the supervisor or a new UI session by [`TestWorld::pump`].

use std::cell::RefCell;
use std::sync::Arc;

use vigil_config::{Config, LogFormat};

use crate::bootstrap::{StaticConfigLoader, Vigil, bootstrap_with_registry};
use crate::exemption::ExemptionStatus;
use crate::recovery::RecoveryReport;
use crate::session::{LaunchIntent, UiSession};
use crate::supervisor::ChannelRegistry;

use super::platform::{PlatformCall, RecordingPlatform};
use super::reporter::RecordingHealthReporter;

pub type StepResult = Result<(), String>;

const MAX_PUMP_ROUNDS: usize = 16;

pub struct TestWorld {
    pub platform: Arc<RecordingPlatform>,
    pub reporter: Arc<RecordingHealthReporter>,
    pub channels: Arc<ChannelRegistry>,
    pub vigil: Vigil,
    pub sessions: Vec<UiSession>,
    pub last_report: Option<RecoveryReport>,
    pub last_status: Option<ExemptionStatus>,
    delivered: usize,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let platform = Arc::new(RecordingPlatform::default());
        let reporter = Arc::new(RecordingHealthReporter::default());
        let channels = Arc::new(ChannelRegistry::new());
        let vigil = bootstrap_with_registry(
            &StaticConfigLoader::new(config),
            reporter.clone(),
            Arc::clone(&platform),
            Arc::clone(&channels),
        )
        .expect("bootstrap should succeed");
        Self {
            platform,
            reporter,
            channels,
            vigil,
            sessions: Vec::new(),
            last_report: None,
            last_status: None,
            delivered: 0,
        }
    }

    /// Opens a UI session the way the host does after a launch.
    pub fn open_session(&mut self, intent: LaunchIntent) -> ExemptionStatus {
        let session = self.vigil.new_session();
        let status = session.on_create(intent);
        self.sessions.push(session);
        self.last_status = Some(status);
        status
    }

    pub fn current_session(&self) -> Result<&UiSession, String> {
        self.sessions
            .last()
            .ok_or_else(|| "no UI session has been created".to_owned())
    }

    /// Delivers queued start requests and UI launches until the platform is idle.
    pub fn pump(&mut self) -> StepResult {
        for _ in 0..MAX_PUMP_ROUNDS {
            let calls = self.platform.calls();
            let pending: Vec<_> = calls.into_iter().skip(self.delivered).collect();
            if pending.is_empty() {
                return Ok(());
            }
            self.delivered += pending.len();
            for call in pending {
                match call {
                    PlatformCall::RequestStart(command) => {
                        self.vigil.supervisor().start(command);
                    }
                    PlatformCall::Launch(presentation) => {
                        self.open_session(LaunchIntent::from(presentation));
                    }
                    _ => {}
                }
            }
        }
        Err("platform did not settle".to_owned())
    }
}

pub fn test_config() -> Config {
    Config {
        log_filter: "vigil=debug".to_owned(),
        log_format: LogFormat::Compact,
        ..Config::default()
    }
}

/// Fresh world for one scenario; each suite wraps it in its own fixture.
pub fn new_world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
