//! Session state that survives network switches.
//!
//! Keys and the selected network are persisted through the injected storage.
//! Activity ledgers live in memory, one per network environment.

use alloy::primitives::U256;

use shielder_adapters::ShielderConfig;
use shielder_core::{
    from_atomic, signing_message, to_atomic, AccountAddress, ActivityLedger, DecimalAmount,
    DecimalInput, KeyDerivationPort, KeyStore, NetworkEnvironment, NetworkPreference,
    ObserveOutcome, RawActivity, ShielderPrivateKey, StoragePort,
};

use crate::error::WalletError;

pub struct WalletSession<S, D>
where
    S: StoragePort + Clone,
    D: KeyDerivationPort,
{
    keys: KeyStore<S>,
    preference: NetworkPreference<S>,
    signer: D,
    active: NetworkEnvironment,
    mainnet_activity: ActivityLedger,
    testnet_activity: ActivityLedger,
}

impl<S, D> WalletSession<S, D>
where
    S: StoragePort + Clone,
    D: KeyDerivationPort,
{
    /// Restores the persisted network selection, or the configured default.
    pub fn new(storage: S, signer: D, config: &ShielderConfig) -> Result<Self, WalletError> {
        let keys = KeyStore::with_namespace(storage.clone(), config.key_namespace.clone());
        let preference = NetworkPreference::with_key(
            storage,
            config.network_preference_key.clone(),
            config.default_network,
        );
        let active = preference.get()?;
        tracing::info!(network = %active, "wallet session opened");
        Ok(Self {
            keys,
            preference,
            signer,
            active,
            mainnet_activity: ActivityLedger::new(),
            testnet_activity: ActivityLedger::new(),
        })
    }

    pub fn active_network(&self) -> NetworkEnvironment {
        self.active
    }

    pub fn switch_network(&mut self, network: NetworkEnvironment) -> Result<(), WalletError> {
        if network == self.active {
            return Ok(());
        }
        self.preference.set(network)?;
        tracing::info!(from = %self.active, to = %network, "switched network");
        self.active = network;
        Ok(())
    }

    /// Key for `address` on the active network, without deriving one.
    pub fn shielder_key(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<ShielderPrivateKey>, WalletError> {
        Ok(self.keys.get(self.active, address)?)
    }

    pub fn store_key(
        &self,
        address: &AccountAddress,
        key: ShielderPrivateKey,
    ) -> Result<(), WalletError> {
        Ok(self.keys.set(self.active, address, key)?)
    }

    /// Returns the stored key, asking the signer to derive one first if the
    /// pair has none. Storage failures are returned before the signer is
    /// asked, so an unreadable store never triggers a signature prompt.
    pub fn ensure_key(&self, address: &AccountAddress) -> Result<ShielderPrivateKey, WalletError> {
        if let Some(key) = self.keys.get(self.active, address)? {
            return Ok(key);
        }
        let key = self
            .signer
            .derive_key(self.active, address, signing_message(self.active))
            .map_err(|e| {
                tracing::warn!(network = %self.active, %address, error = %e, "key derivation failed");
                WalletError::Signer(e)
            })?;
        self.keys.set(self.active, address, key)?;
        tracing::info!(network = %self.active, %address, "derived shielder key");
        Ok(key)
    }

    /// Disconnect path: drops the active network's key for `address`.
    pub fn forget_key(&self, address: &AccountAddress) -> Result<bool, WalletError> {
        Ok(self.keys.remove(self.active, address)?)
    }

    pub fn known_accounts(&self) -> Result<Vec<AccountAddress>, WalletError> {
        Ok(self.keys.addresses(self.active)?)
    }

    pub fn display_balance(&self, atomic: U256, decimals: u8) -> DecimalAmount {
        from_atomic(atomic, decimals)
    }

    pub fn parse_amount(&self, input: impl Into<DecimalInput>, decimals: u8) -> U256 {
        to_atomic(input, decimals)
    }

    pub fn observe_activity(&mut self, raw: &RawActivity) -> Result<ObserveOutcome, WalletError> {
        let network = self.active;
        let outcome = self.ledger_mut().observe(raw).map_err(|e| {
            tracing::warn!(%network, error = %e, "rejected activity snapshot");
            e
        })?;
        tracing::debug!(%network, identity = %outcome.identity(), ?outcome, "observed activity");
        Ok(outcome)
    }

    pub fn activity(&self) -> &ActivityLedger {
        match self.active {
            NetworkEnvironment::Mainnet => &self.mainnet_activity,
            NetworkEnvironment::Testnet => &self.testnet_activity,
        }
    }

    fn ledger_mut(&mut self) -> &mut ActivityLedger {
        match self.active {
            NetworkEnvironment::Mainnet => &mut self.mainnet_activity,
            NetworkEnvironment::Testnet => &mut self.testnet_activity,
        }
    }
}
