use thiserror::Error;

use crate::domain::NetworkEnvironment;
use crate::ports::{PortError, StoragePort};

pub const DEFAULT_NETWORK_PREFERENCE_KEY: &str = "shielder.selected_network";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("network preference storage unavailable: {0}")]
    StorageUnavailable(#[from] PortError),
    #[error("stored network preference is corrupt: {0}")]
    Corrupt(String),
}

/// Persisted choice of active network environment.
pub struct NetworkPreference<S: StoragePort> {
    storage: S,
    key: String,
    default_network: NetworkEnvironment,
}

impl<S: StoragePort> NetworkPreference<S> {
    pub fn new(storage: S, default_network: NetworkEnvironment) -> Self {
        Self::with_key(storage, DEFAULT_NETWORK_PREFERENCE_KEY, default_network)
    }

    pub fn with_key(storage: S, key: impl Into<String>, default_network: NetworkEnvironment) -> Self {
        Self {
            storage,
            key: key.into(),
            default_network,
        }
    }

    /// Stored network, or the default when nothing has been stored.
    pub fn get(&self) -> Result<NetworkEnvironment, PreferenceError> {
        match self.storage.get_string(&self.key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| PreferenceError::Corrupt(e.to_string())),
            None => Ok(self.default_network),
        }
    }

    pub fn set(&self, network: NetworkEnvironment) -> Result<(), PreferenceError> {
        let raw = serde_json::to_string(&network)
            .map_err(|e| PreferenceError::Corrupt(e.to_string()))?;
        self.storage.set_string(&self.key, &raw)?;
        Ok(())
    }
}
