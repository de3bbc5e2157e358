#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::B256;
use shielder_adapters::ShielderConfig;
use shielder_core::ShielderPrivateKey;

static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Temp directory removed, with everything under it, when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, child: impl AsRef<Path>) -> PathBuf {
        self.path.join(child)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Fresh directory under the system temp dir, unique per call. Keep the
/// guard alive for as long as the test uses paths inside it.
pub fn scratch_dir(label: &str) -> ScratchDir {
    let path = std::env::temp_dir().join(format!(
        "shielder-{label}-{}-{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_dir_all(&path);
    ScratchDir { path }
}

/// Default config with KDF costs low enough for tests.
pub fn fast_kdf_config() -> ShielderConfig {
    ShielderConfig {
        argon2_memory_kib: 64,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        pbkdf2_rounds: 1_000,
        ..ShielderConfig::default()
    }
}

pub fn key(seed: u8) -> ShielderPrivateKey {
    ShielderPrivateKey::new(B256::repeat_byte(seed))
}
