use std::fmt;

/// Tag carried by a start request addressed to the supervisor.
///
/// Every variant converges on the same foregrounded state; the tag only
/// records why the start was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Ordinary start from the host UI.
    StartAlarms,
    /// Start issued after a boot or package update.
    RestartAlarms,
    /// Start the supervisor issues to itself after involuntary termination.
    RestartService,
}

impl Command {
    /// Raw tag used on the platform start request.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::StartAlarms => "START_ALARMS",
            Self::RestartAlarms => "RESTART_ALARMS",
            Self::RestartService => "RESTART_SERVICE",
        }
    }

    /// Decodes a raw tag. Missing or unrecognised tags mean `START_ALARMS`.
    #[must_use]
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("RESTART_ALARMS") => Self::RestartAlarms,
            Some("RESTART_SERVICE") => Self::RestartService,
            _ => Self::StartAlarms,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.tag())
    }
}
