pub mod config;
pub mod crypto;
pub mod encrypted;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

pub use config::ShielderConfig;
pub use encrypted::EncryptedStorageAdapter;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorageAdapter;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageAdapter;
pub use memory::MemoryStorageAdapter;
