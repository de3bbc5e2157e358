//! At-rest encryption for any storage port.
//!
//! The salt and KDF choice live in plaintext under `encryption_kdf_key`;
//! every other value is stored as an envelope
//! `{"v":1,"nonce":"<b64>","ciphertext":"<b64>"}` sealed with the storage
//! key name as associated data, so an envelope copied to another key does
//! not decrypt.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use shielder_core::{PortError, StoragePort};

use crate::config::ShielderConfig;
use crate::crypto::{
    decrypt_aes_gcm, derive_storage_key, encrypt_aes_gcm, generate_nonce, generate_salt,
    KdfAlgorithm, KdfParams,
};

const ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct KdfRecord {
    kdf_algorithm: KdfAlgorithm,
    salt: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SealedValue {
    v: u32,
    nonce: String,
    ciphertext: String,
}

pub struct EncryptedStorageAdapter<S: StoragePort> {
    inner: S,
    kdf_key: String,
    enc_key: [u8; 32],
    kdf_algorithm: KdfAlgorithm,
}

impl<S: StoragePort> std::fmt::Debug for EncryptedStorageAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedStorageAdapter")
            .field("kdf_key", &self.kdf_key)
            .field("kdf_algorithm", &self.kdf_algorithm)
            .finish_non_exhaustive()
    }
}

impl<S: StoragePort> EncryptedStorageAdapter<S> {
    /// Derives the storage key from `passphrase`, creating and persisting a
    /// fresh salt on first use.
    pub fn open(inner: S, passphrase: &[u8], config: &ShielderConfig) -> Result<Self, PortError> {
        let params = KdfParams::from(config);
        let kdf_key = config.encryption_kdf_key.clone();

        let (enc_key, kdf_algorithm) = match inner.get_string(&kdf_key)? {
            Some(raw) => {
                let record: KdfRecord = serde_json::from_str(&raw)
                    .map_err(|e| PortError::Validation(format!("kdf record unreadable: {e}")))?;
                let salt = decode_fixed::<16>(&record.salt, "salt")?;
                derive_storage_key(passphrase, &salt, params, Some(record.kdf_algorithm))?
            }
            None => {
                let salt = generate_salt()?;
                let (enc_key, algorithm) = derive_storage_key(passphrase, &salt, params, None)?;
                let record = KdfRecord {
                    kdf_algorithm: algorithm,
                    salt: STANDARD.encode(salt),
                };
                let raw = serde_json::to_string(&record)
                    .map_err(|e| PortError::Validation(format!("kdf record serialize: {e}")))?;
                inner.set_string(&kdf_key, &raw)?;
                tracing::info!(?algorithm, "initialized encrypted storage");
                (enc_key, algorithm)
            }
        };

        Ok(Self {
            inner,
            kdf_key,
            enc_key,
            kdf_algorithm,
        })
    }

    pub fn kdf_algorithm(&self) -> KdfAlgorithm {
        self.kdf_algorithm
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn reject_reserved(&self, key: &str) -> Result<(), PortError> {
        if key == self.kdf_key {
            return Err(PortError::Validation(format!(
                "storage key {key} is reserved for the kdf record"
            )));
        }
        Ok(())
    }
}

impl<S: StoragePort> StoragePort for EncryptedStorageAdapter<S> {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        self.reject_reserved(key)?;
        let Some(raw) = self.inner.get_string(key)? else {
            return Ok(None);
        };
        let sealed: SealedValue = serde_json::from_str(&raw)
            .map_err(|e| PortError::Validation(format!("sealed value unreadable: {e}")))?;
        if sealed.v != ENVELOPE_VERSION {
            return Err(PortError::Validation(format!(
                "unsupported sealed value version: {}",
                sealed.v
            )));
        }
        let nonce = decode_fixed::<12>(&sealed.nonce, "nonce")?;
        let ciphertext = STANDARD
            .decode(&sealed.ciphertext)
            .map_err(|e| PortError::Validation(format!("ciphertext is not base64: {e}")))?;
        let plaintext = decrypt_aes_gcm(&self.enc_key, nonce, &ciphertext, key.as_bytes())?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|e| PortError::Validation(format!("decrypted value is not utf-8: {e}")))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        self.reject_reserved(key)?;
        let nonce = generate_nonce()?;
        let ciphertext = encrypt_aes_gcm(&self.enc_key, nonce, value.as_bytes(), key.as_bytes())?;
        let sealed = SealedValue {
            v: ENVELOPE_VERSION,
            nonce: STANDARD.encode(nonce),
            ciphertext: STANDARD.encode(ciphertext),
        };
        let raw = serde_json::to_string(&sealed)
            .map_err(|e| PortError::Validation(format!("sealed value serialize: {e}")))?;
        self.inner.set_string(key, &raw)
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        self.reject_reserved(key)?;
        self.inner.remove(key)
    }
}

fn decode_fixed<const N: usize>(encoded: &str, what: &str) -> Result<[u8; N], PortError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| PortError::Validation(format!("{what} is not base64: {e}")))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        PortError::Validation(format!("{what} must be {N} bytes, got {}", bytes.len()))
    })
}
