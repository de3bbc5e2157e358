use std::fmt;
use std::str::FromStr;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkEnvironment {
    Mainnet,
    Testnet,
}

impl NetworkEnvironment {
    pub const ALL: [NetworkEnvironment; 2] = [NetworkEnvironment::Mainnet, NetworkEnvironment::Testnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkEnvironment::Mainnet => "mainnet",
            NetworkEnvironment::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkEnvironment {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NetworkEnvironment::Mainnet),
            "testnet" => Ok(NetworkEnvironment::Testnet),
            other => Err(PortError::Validation(format!(
                "unknown network environment: {other}"
            ))),
        }
    }
}

/// Message the wallet signs to derive the shielder key.
///
/// The text must stay byte-identical across releases: changing it changes
/// every derived key for that environment.
pub fn signing_message(network: NetworkEnvironment) -> &'static str {
    match network {
        NetworkEnvironment::Mainnet => {
            "Sign this message to derive your Shielder private key on Mainnet.\n\nOnly sign this message on a site you trust. Signing it does not cost gas."
        }
        NetworkEnvironment::Testnet => {
            "Sign this message to derive your Shielder private key on Testnet.\n\nOnly sign this message on a site you trust. Signing it does not cost gas."
        }
    }
}

/// Wallet account identifier, trimmed and lowercased on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountAddress {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for AccountAddress {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

impl From<alloy::primitives::Address> for AccountAddress {
    fn from(address: alloy::primitives::Address) -> Self {
        Self::new(address.to_string())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShielderPrivateKey(B256);

impl ShielderPrivateKey {
    pub fn new(bytes: B256) -> Self {
        Self(bytes)
    }

    pub fn expose(&self) -> &B256 {
        &self.0
    }
}

impl From<B256> for ShielderPrivateKey {
    fn from(bytes: B256) -> Self {
        Self(bytes)
    }
}

impl FromStr for ShielderPrivateKey {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<B256>()
            .map(Self)
            .map_err(|e| PortError::Validation(format!("invalid shielder key: {e}")))
    }
}

impl fmt::Debug for ShielderPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShielderPrivateKey(<redacted>)")
    }
}
