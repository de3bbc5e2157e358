use shielder_core::{NetworkEnvironment, DEFAULT_KEY_NAMESPACE, DEFAULT_NETWORK_PREFERENCE_KEY};

#[derive(Debug, Clone)]
pub struct ShielderConfig {
    pub key_namespace: String,
    pub network_preference_key: String,
    pub default_network: NetworkEnvironment,
    pub storage_file_name: String,
    /// Storage key holding the salt and KDF choice for encrypted storage.
    pub encryption_kdf_key: String,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
    pub pbkdf2_rounds: u32,
}

impl Default for ShielderConfig {
    fn default() -> Self {
        Self {
            key_namespace: DEFAULT_KEY_NAMESPACE.to_owned(),
            network_preference_key: DEFAULT_NETWORK_PREFERENCE_KEY.to_owned(),
            default_network: NetworkEnvironment::Mainnet,
            storage_file_name: "shielder-storage.json".to_owned(),
            encryption_kdf_key: "shielder.kdf".to_owned(),
            argon2_memory_kib: 65_536,
            argon2_iterations: 3,
            argon2_parallelism: 1,
            pbkdf2_rounds: 600_000,
        }
    }
}
