#![warn(missing_docs)]
//! Optional third-party integrations with a uniform load/unload lifecycle.
//!
//! An integration that fails to load is logged and treated as unavailable.
//! Failures never reach the routing engine.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, info, warn};

/// Version reported by integrations that do not override it.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Why an integration could not be loaded or unloaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrationError {
    /// The external system the integration wraps is not present.
    #[error("{0} is not available")]
    Unavailable(String),
    /// The integration was present but refused to start.
    #[error("{name} failed: {reason}")]
    Failed {
        /// Integration name.
        name: String,
        /// Human-readable cause.
        reason: String,
    },
}

/// Lifecycle contract shared by every optional integration.
pub trait Integration: Send + Sync {
    /// Name of the external system this integration wraps.
    fn plugin_name(&self) -> &str;

    /// Start the integration.
    fn load(&mut self) -> Result<(), IntegrationError>;

    /// Stop the integration and release whatever it holds.
    fn unload(&mut self) -> Result<(), IntegrationError>;

    /// Whether the integration is currently running.
    fn is_active(&self) -> bool;

    /// Integration version.
    fn version(&self) -> &str {
        DEFAULT_VERSION
    }
}

/// Point-in-time view of a loaded integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationStatus {
    /// Lowercased key the integration was loaded under.
    pub key: String,
    /// Name reported by the integration itself.
    pub plugin_name: String,
    /// Reported version.
    pub version: String,
    /// Whether it reports itself active.
    pub active: bool,
}

/// Owns loaded integrations, keyed case-insensitively.
#[derive(Default)]
pub struct IntegrationManager {
    loaded: RwLock<BTreeMap<String, Box<dyn Integration>>>,
}

impl IntegrationManager {
    /// Empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to load `integration` under `name`.
    ///
    /// Returns whether it is now available. A failed load is logged and the
    /// integration dropped.
    pub fn load(&self, name: &str, mut integration: Box<dyn Integration>) -> bool {
        match integration.load() {
            Ok(()) => {
                info!(
                    integration = name,
                    version = integration.version(),
                    "loaded integration"
                );
                self.loaded.write().insert(name.to_lowercase(), integration);
                true
            }
            Err(err @ IntegrationError::Unavailable(_)) => {
                warn!(integration = name, %err, "integration unavailable");
                false
            }
            Err(err) => {
                error!(integration = name, %err, "error loading integration");
                false
            }
        }
    }

    /// Load every candidate in order and log a summary.
    pub fn load_all<I>(&self, candidates: I) -> usize
    where
        I: IntoIterator<Item = (String, Box<dyn Integration>)>,
    {
        let loaded = candidates
            .into_iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, integration)| self.load(&name, integration))
            .filter(|ok| *ok)
            .count();

        let names = self.loaded_names();
        if names.is_empty() {
            info!("no optional integrations loaded");
        } else {
            info!(count = names.len(), names = %names.join(", "), "integrations loaded");
        }
        loaded
    }

    /// Status of the integration loaded under `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<IntegrationStatus> {
        let key = name.to_lowercase();
        self.loaded.read().get(&key).map(|integration| IntegrationStatus {
            plugin_name: integration.plugin_name().to_string(),
            version: integration.version().to_string(),
            active: integration.is_active(),
            key,
        })
    }

    /// Whether an integration is loaded under `name`, ignoring case.
    pub fn has(&self, name: &str) -> bool {
        self.loaded.read().contains_key(&name.to_lowercase())
    }

    /// Keys of loaded integrations, sorted.
    pub fn loaded_names(&self) -> Vec<String> {
        self.loaded.read().keys().cloned().collect()
    }

    /// Number of loaded integrations.
    pub fn len(&self) -> usize {
        self.loaded.read().len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.read().is_empty()
    }

    /// Unload everything. Unload errors are logged and do not stop the sweep.
    pub fn unload_all(&self) {
        let drained = std::mem::take(&mut *self.loaded.write());
        for (key, mut integration) in drained {
            if let Err(err) = integration.unload() {
                warn!(integration = %key, %err, "error unloading integration");
            }
        }
    }
}
