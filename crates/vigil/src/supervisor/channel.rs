//! Process-wide, create-if-absent registration of announcement channels.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;

use crate::error::PlatformError;
use crate::platform::{ChannelSpec, ForegroundHost};

static GLOBAL: Lazy<Arc<ChannelRegistry>> = Lazy::new(|| Arc::new(ChannelRegistry::new()));

/// Tracks which channel identifiers were registered in this process.
///
/// Registration runs under the registry lock, so concurrent starts register
/// a given identifier exactly once. A failed registration is not recorded and
/// is retried by the next caller.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    registered: Mutex<HashSet<String>>,
}

impl ChannelRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by every supervisor incarnation in the process.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Registers `spec` with the host unless its identifier is already known.
    ///
    /// Returns `true` when this call performed the registration.
    pub fn ensure_registered(
        &self,
        host: &dyn ForegroundHost,
        spec: &ChannelSpec,
    ) -> Result<bool, PlatformError> {
        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if registered.contains(&spec.id) {
            return Ok(false);
        }
        host.register_channel(spec)?;
        registered.insert(spec.id.clone());
        Ok(true)
    }

    /// Whether `id` has been registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}
