use shielder_core::{ActivityError, KeyStoreError, PortError, PreferenceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Keys(#[from] KeyStoreError),
    #[error(transparent)]
    Preference(#[from] PreferenceError),
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error("key derivation failed: {0}")]
    Signer(PortError),
}

impl WalletError {
    /// True when persistence could not answer; the caller may retry.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(
            self,
            WalletError::Keys(KeyStoreError::StorageUnavailable(_))
                | WalletError::Preference(PreferenceError::StorageUnavailable(_))
        )
    }
}
