//! Shielder keys scoped by network environment and account.
//!
//! Persisted as a single JSON document under one storage key:
//! `{"mainnet": {"<address>": "<key>"}, "testnet": {...}}`. Each environment
//! deserializes into its own map, so a key written under one environment
//! is never returned for the other.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AccountAddress, NetworkEnvironment, ShielderPrivateKey};
use crate::ports::{PortError, StoragePort};

pub const DEFAULT_KEY_NAMESPACE: &str = "shielder.private_keys";

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("key storage unavailable: {0}")]
    StorageUnavailable(#[from] PortError),
    #[error("persisted key map is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedKeys {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    mainnet: BTreeMap<AccountAddress, ShielderPrivateKey>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    testnet: BTreeMap<AccountAddress, ShielderPrivateKey>,
}

impl PersistedKeys {
    fn scope(&self, network: NetworkEnvironment) -> &BTreeMap<AccountAddress, ShielderPrivateKey> {
        match network {
            NetworkEnvironment::Mainnet => &self.mainnet,
            NetworkEnvironment::Testnet => &self.testnet,
        }
    }

    fn scope_mut(
        &mut self,
        network: NetworkEnvironment,
    ) -> &mut BTreeMap<AccountAddress, ShielderPrivateKey> {
        match network {
            NetworkEnvironment::Mainnet => &mut self.mainnet,
            NetworkEnvironment::Testnet => &mut self.testnet,
        }
    }
}

pub struct KeyStore<S: StoragePort> {
    storage: S,
    namespace: String,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl<S: StoragePort> KeyStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_KEY_NAMESPACE)
    }

    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// `Ok(None)` means no key has been stored for this pair yet.
    pub fn get(
        &self,
        network: NetworkEnvironment,
        address: &AccountAddress,
    ) -> Result<Option<ShielderPrivateKey>, KeyStoreError> {
        let persisted = self.load()?;
        Ok(persisted.scope(network).get(address).copied())
    }

    /// Stores `key`, replacing any key already held for the pair.
    pub fn set(
        &self,
        network: NetworkEnvironment,
        address: &AccountAddress,
        key: ShielderPrivateKey,
    ) -> Result<(), KeyStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut persisted = self.load()?;
        let replaced = persisted
            .scope_mut(network)
            .insert(address.clone(), key)
            .is_some();
        self.persist(&persisted)?;
        tracing::debug!(%network, %address, replaced, "stored shielder key");
        Ok(())
    }

    /// Drops the key for the pair. Returns whether one was present.
    pub fn remove(
        &self,
        network: NetworkEnvironment,
        address: &AccountAddress,
    ) -> Result<bool, KeyStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut persisted = self.load()?;
        if persisted.scope_mut(network).remove(address).is_none() {
            return Ok(false);
        }
        self.persist(&persisted)?;
        tracing::debug!(%network, %address, "removed shielder key");
        Ok(true)
    }

    pub fn addresses(
        &self,
        network: NetworkEnvironment,
    ) -> Result<Vec<AccountAddress>, KeyStoreError> {
        let persisted = self.load()?;
        Ok(persisted.scope(network).keys().cloned().collect())
    }

    fn load(&self) -> Result<PersistedKeys, KeyStoreError> {
        let Some(raw) = self.storage.get_string(&self.namespace).map_err(|e| {
            tracing::warn!(namespace = %self.namespace, error = %e, "key storage read failed");
            KeyStoreError::StorageUnavailable(e)
        })?
        else {
            return Ok(PersistedKeys::default());
        };
        serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(namespace = %self.namespace, error = %e, "persisted key map is corrupt");
            KeyStoreError::Corrupt(e.to_string())
        })
    }

    fn persist(&self, persisted: &PersistedKeys) -> Result<(), KeyStoreError> {
        let raw = serde_json::to_string(persisted)
            .map_err(|e| KeyStoreError::Corrupt(format!("key map serialization failed: {e}")))?;
        self.storage.set_string(&self.namespace, &raw).map_err(|e| {
            tracing::warn!(namespace = %self.namespace, error = %e, "key storage write failed");
            KeyStoreError::StorageUnavailable(e)
        })
    }
}
