use std::fmt;

/// Lifecycle state owned by the liveness supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ServiceState {
    /// Never started in this process.
    #[default]
    Stopped,
    /// Start accepted; running without foreground elevation yet.
    Starting,
    /// Elevated and announcing liveness.
    Foregrounded,
    /// Torn down by the OS. Transient: a restart is re-issued immediately.
    Destroyed,
}

impl ServiceState {
    /// `Starting` and `Foregrounded` are both "running" from the outside.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Starting | Self::Foregrounded)
    }

    /// Applies a lifecycle event and returns the resulting state.
    #[must_use]
    pub const fn on(self, event: LifecycleEvent) -> Self {
        match (self, event) {
            (Self::Foregrounded, LifecycleEvent::StartRequested) => Self::Foregrounded,
            (_, LifecycleEvent::StartRequested) => Self::Starting,
            (Self::Starting, LifecycleEvent::Elevated) => Self::Foregrounded,
            (_, LifecycleEvent::Destroyed) => Self::Destroyed,
            (Self::Destroyed, LifecycleEvent::RestartIssued) => Self::Starting,
            (state, _) => state,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Foregrounded => "foregrounded",
            Self::Destroyed => "destroyed",
        };
        formatter.write_str(label)
    }
}

/// Inputs to the supervisor state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A start callback arrived.
    StartRequested,
    /// The announcement was published and the task elevated.
    Elevated,
    /// The OS tore the task down.
    Destroyed,
    /// The supervisor re-issued its own start request.
    RestartIssued,
}
