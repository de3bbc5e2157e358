#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, B256};
use shielder_adapters::{MemoryStorageAdapter, ShielderConfig};
use shielder_core::{
    AccountAddress, KeyDerivationPort, NetworkEnvironment, PortError, ShielderPrivateKey,
    StoragePort,
};
use shielder_wallet::WalletSession;

/// Derives `keccak256(network || address || message)` and records every
/// message it was asked to sign.
#[derive(Debug, Clone, Default)]
pub struct RecordingSigner {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub refuse: bool,
}

impl RecordingSigner {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

impl KeyDerivationPort for RecordingSigner {
    fn derive_key(
        &self,
        network: NetworkEnvironment,
        address: &AccountAddress,
        message: &str,
    ) -> Result<ShielderPrivateKey, PortError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(message.to_owned());
        if self.refuse {
            return Err(PortError::Transport("user rejected signature".to_owned()));
        }
        let material = format!("{network}|{address}|{message}");
        Ok(ShielderPrivateKey::new(keccak256(material.as_bytes())))
    }
}

#[derive(Debug, Clone, Default)]
pub struct OfflineStorage;

impl StoragePort for OfflineStorage {
    fn get_string(&self, _key: &str) -> Result<Option<String>, PortError> {
        Err(PortError::Transport("storage offline".to_owned()))
    }

    fn set_string(&self, _key: &str, _value: &str) -> Result<(), PortError> {
        Err(PortError::Transport("storage offline".to_owned()))
    }

    fn remove(&self, _key: &str) -> Result<(), PortError> {
        Err(PortError::Transport("storage offline".to_owned()))
    }
}

pub fn new_session(
    storage: MemoryStorageAdapter,
    signer: RecordingSigner,
) -> WalletSession<MemoryStorageAdapter, RecordingSigner> {
    shielder_wallet::init_logging();
    WalletSession::new(storage, signer, &ShielderConfig::default()).expect("open session")
}

pub fn fixed_key(seed: u8) -> ShielderPrivateKey {
    ShielderPrivateKey::new(B256::repeat_byte(seed))
}
