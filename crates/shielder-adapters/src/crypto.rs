use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use shielder_core::PortError;

use crate::config::ShielderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfAlgorithm {
    Argon2idV1,
    Pbkdf2HmacSha256V1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
    pub pbkdf2_rounds: u32,
}

impl From<&ShielderConfig> for KdfParams {
    fn from(config: &ShielderConfig) -> Self {
        Self {
            argon2_memory_kib: config.argon2_memory_kib,
            argon2_iterations: config.argon2_iterations,
            argon2_parallelism: config.argon2_parallelism,
            pbkdf2_rounds: config.pbkdf2_rounds,
        }
    }
}

pub fn generate_salt() -> Result<[u8; 16], PortError> {
    let mut salt = [0u8; 16];
    getrandom::getrandom(&mut salt)
        .map_err(|e| PortError::Transport(format!("salt generation failed: {e}")))?;
    Ok(salt)
}

pub fn generate_nonce() -> Result<[u8; 12], PortError> {
    let mut nonce = [0u8; 12];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| PortError::Transport(format!("nonce generation failed: {e}")))?;
    Ok(nonce)
}

/// Derives the storage encryption key. `preferred` pins the algorithm for
/// salts created earlier; `None` tries Argon2id and falls back to PBKDF2.
pub fn derive_storage_key(
    passphrase: &[u8],
    salt: &[u8; 16],
    params: KdfParams,
    preferred: Option<KdfAlgorithm>,
) -> Result<([u8; 32], KdfAlgorithm), PortError> {
    let (root, algorithm) = match preferred {
        Some(KdfAlgorithm::Argon2idV1) => (
            argon2_root(passphrase, salt, params)?,
            KdfAlgorithm::Argon2idV1,
        ),
        Some(KdfAlgorithm::Pbkdf2HmacSha256V1) => (
            pbkdf2_root(passphrase, salt, params),
            KdfAlgorithm::Pbkdf2HmacSha256V1,
        ),
        None => match argon2_root(passphrase, salt, params) {
            Ok(root) => (root, KdfAlgorithm::Argon2idV1),
            Err(e) => {
                tracing::warn!(error = %e, "argon2id unavailable, using pbkdf2");
                (pbkdf2_root(passphrase, salt, params), KdfAlgorithm::Pbkdf2HmacSha256V1)
            }
        },
    };

    let hk = Hkdf::<Sha256>::new(None, &root);
    let mut enc_key = [0u8; 32];
    hk.expand(b"shielder_storage_enc_v1", &mut enc_key)
        .map_err(|_| PortError::Validation("hkdf expand for storage key failed".to_owned()))?;
    Ok((enc_key, algorithm))
}

fn argon2_root(passphrase: &[u8], salt: &[u8; 16], params: KdfParams) -> Result<[u8; 32], PortError> {
    let params = Params::new(
        params.argon2_memory_kib,
        params.argon2_iterations,
        params.argon2_parallelism,
        Some(32),
    )
    .map_err(|e| PortError::Validation(format!("argon2 params rejected: {e}")))?;
    let mut root = [0u8; 32];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(passphrase, salt, &mut root)
        .map_err(|e| PortError::Validation(format!("argon2 derivation failed: {e}")))?;
    Ok(root)
}

fn pbkdf2_root(passphrase: &[u8], salt: &[u8; 16], params: KdfParams) -> [u8; 32] {
    let mut root = [0u8; 32];
    pbkdf2_hmac::<Sha256>(passphrase, salt, params.pbkdf2_rounds, &mut root);
    root
}

/// AES-256-GCM; `aad` binds the ciphertext to where it is stored.
pub fn encrypt_aes_gcm(
    enc_key: &[u8; 32],
    nonce: [u8; 12],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, PortError> {
    let cipher = Aes256Gcm::new_from_slice(enc_key)
        .map_err(|e| PortError::Validation(format!("aes-gcm init failed: {e}")))?;
    let nonce = Nonce::<aes_gcm::aead::consts::U12>::from(nonce);
    cipher
        .encrypt(&nonce, Payload { msg: plaintext, aad })
        .map_err(|e| PortError::Transport(format!("aes-gcm encrypt failed: {e}")))
}

pub fn decrypt_aes_gcm(
    enc_key: &[u8; 32],
    nonce: [u8; 12],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, PortError> {
    let cipher = Aes256Gcm::new_from_slice(enc_key)
        .map_err(|e| PortError::Validation(format!("aes-gcm init failed: {e}")))?;
    let nonce = Nonce::<aes_gcm::aead::consts::U12>::from(nonce);
    cipher
        .decrypt(&nonce, Payload { msg: ciphertext, aad })
        .map_err(|e| PortError::Validation(format!("aes-gcm decrypt failed: {e}")))
}
