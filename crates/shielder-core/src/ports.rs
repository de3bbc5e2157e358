use std::sync::Arc;

use thiserror::Error;

use crate::domain::{AccountAddress, NetworkEnvironment, ShielderPrivateKey};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Durable string key-value store.
///
/// `set_string` must replace the whole value for `key` in one step; readers
/// see either the previous value or the new one.
pub trait StoragePort {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError>;
    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError>;
    fn remove(&self, key: &str) -> Result<(), PortError>;
}

impl<T: StoragePort + ?Sized> StoragePort for Arc<T> {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        (**self).get_string(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        (**self).set_string(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        (**self).remove(key)
    }
}

impl<T: StoragePort + ?Sized> StoragePort for &T {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        (**self).get_string(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        (**self).set_string(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        (**self).remove(key)
    }
}

/// Wallet signer plus SDK derivation: signs `message` with `address` and
/// turns the signature into a shielder key.
pub trait KeyDerivationPort {
    fn derive_key(
        &self,
        network: NetworkEnvironment,
        address: &AccountAddress,
        message: &str,
    ) -> Result<ShielderPrivateKey, PortError>;
}
