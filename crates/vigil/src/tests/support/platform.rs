//! Recording host adapter with scriptable faults and a manual clock.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};

use crate::error::PlatformError;
use crate::platform::{
    Announcement, AnnouncementId, ChannelSpec, Clock, ForegroundHost, PlatformVersion,
    PowerPolicy, Presentation, ServiceLauncher, UiHost,
};
use crate::supervisor::Command;

pub const TEST_IDENTITY: &str = "org.example.alarms";

/// Every call the core made into the platform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    RegisterChannel(String),
    StartForeground(AnnouncementId),
    StopForeground,
    RequestStart(Command),
    Launch(Presentation),
    MoveToBack,
    ShowTransient(String),
    RequestExemption { identity: String, request_code: i32 },
}

/// Platform operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    RegisterChannel,
    RequestStart,
    Launch,
    MoveToBack,
    RequestExemption,
}

pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    faults: Mutex<HashSet<Fault>>,
    denied_elevations: AtomicU32,
    version: AtomicU32,
    exempt: AtomicBool,
    now: Mutex<Instant>,
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            faults: Mutex::new(HashSet::new()),
            denied_elevations: AtomicU32::new(0),
            version: AtomicU32::new(34),
            exempt: AtomicBool::new(false),
            now: Mutex::new(Instant::now()),
        }
    }
}

impl RecordingPlatform {
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn count(&self, predicate: impl Fn(&PlatformCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn fail_on(&self, fault: Fault) {
        self.faults.lock().expect("faults mutex poisoned").insert(fault);
    }

    pub fn clear_fault(&self, fault: Fault) {
        self.faults.lock().expect("faults mutex poisoned").remove(&fault);
    }

    pub fn deny_elevations(&self, count: u32) {
        self.denied_elevations.store(count, Ordering::SeqCst);
    }

    pub fn set_version(&self, version: u32) {
        self.version.store(version, Ordering::SeqCst);
    }

    pub fn set_exempt(&self, exempt: bool) {
        self.exempt.store(exempt, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += by;
    }

    /// Announcements published and not yet retracted.
    pub fn outstanding_announcements(&self) -> usize {
        let published = self.count(|call| matches!(call, PlatformCall::StartForeground(_)));
        let retracted = self.count(|call| matches!(call, PlatformCall::StopForeground));
        published.saturating_sub(retracted)
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }

    fn check(&self, fault: Fault, operation: &'static str) -> Result<(), PlatformError> {
        if self
            .faults
            .lock()
            .expect("faults mutex poisoned")
            .contains(&fault)
        {
            return Err(PlatformError::failed(operation, "scripted failure"));
        }
        Ok(())
    }
}

impl ForegroundHost for RecordingPlatform {
    fn register_channel(&self, channel: &ChannelSpec) -> Result<(), PlatformError> {
        self.check(Fault::RegisterChannel, "register_channel")?;
        self.record(PlatformCall::RegisterChannel(channel.id.clone()));
        Ok(())
    }

    fn start_foreground(
        &self,
        id: AnnouncementId,
        _announcement: &Announcement,
    ) -> Result<(), PlatformError> {
        let denied = self
            .denied_elevations
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if denied {
            return Err(PlatformError::policy_denied(
                "start_foreground",
                "foreground start not allowed",
            ));
        }
        self.record(PlatformCall::StartForeground(id));
        Ok(())
    }

    fn stop_foreground(&self) -> Result<(), PlatformError> {
        self.record(PlatformCall::StopForeground);
        Ok(())
    }
}

impl ServiceLauncher for RecordingPlatform {
    fn request_start(&self, command: Command) -> Result<(), PlatformError> {
        self.check(Fault::RequestStart, "request_start")?;
        self.record(PlatformCall::RequestStart(command));
        Ok(())
    }
}

impl UiHost for RecordingPlatform {
    fn launch(&self, presentation: Presentation) -> Result<(), PlatformError> {
        self.check(Fault::Launch, "launch")?;
        self.record(PlatformCall::Launch(presentation));
        Ok(())
    }

    fn move_to_back(&self) -> Result<(), PlatformError> {
        self.check(Fault::MoveToBack, "move_to_back")?;
        self.record(PlatformCall::MoveToBack);
        Ok(())
    }

    fn show_transient(&self, message: &str) {
        self.record(PlatformCall::ShowTransient(message.to_owned()));
    }
}

impl PowerPolicy for RecordingPlatform {
    fn platform_version(&self) -> PlatformVersion {
        PlatformVersion(self.version.load(Ordering::SeqCst))
    }

    fn is_exempt(&self) -> bool {
        self.exempt.load(Ordering::SeqCst)
    }

    fn process_identity(&self) -> String {
        TEST_IDENTITY.to_owned()
    }

    fn request_exemption(&self, identity: &str, request_code: i32) -> Result<(), PlatformError> {
        self.check(Fault::RequestExemption, "request_exemption")?;
        self.record(PlatformCall::RequestExemption {
            identity: identity.to_owned(),
            request_code,
        });
        Ok(())
    }
}

impl Clock for RecordingPlatform {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock mutex poisoned")
    }
}
