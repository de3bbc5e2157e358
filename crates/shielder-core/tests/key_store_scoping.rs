use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::B256;
use shielder_core::{
    AccountAddress, KeyStore, KeyStoreError, NetworkEnvironment, NetworkPreference, PortError,
    PreferenceError, ShielderPrivateKey, StoragePort, DEFAULT_KEY_NAMESPACE,
    DEFAULT_NETWORK_PREFERENCE_KEY,
};

#[derive(Debug, Default)]
struct MapStorage {
    values: Mutex<HashMap<String, String>>,
}

impl StoragePort for MapStorage {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        Ok(self.values.lock().expect("storage lock").get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        self.values
            .lock()
            .expect("storage lock")
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        self.values.lock().expect("storage lock").remove(key);
        Ok(())
    }
}

struct OfflineStorage;

impl StoragePort for OfflineStorage {
    fn get_string(&self, _key: &str) -> Result<Option<String>, PortError> {
        Err(PortError::Transport("medium offline".to_owned()))
    }

    fn set_string(&self, _key: &str, _value: &str) -> Result<(), PortError> {
        Err(PortError::Transport("medium offline".to_owned()))
    }

    fn remove(&self, _key: &str) -> Result<(), PortError> {
        Err(PortError::Transport("medium offline".to_owned()))
    }
}

fn key(seed: u8) -> ShielderPrivateKey {
    ShielderPrivateKey::new(B256::repeat_byte(seed))
}

#[test]
fn absent_key_is_not_an_error() {
    let store = KeyStore::new(MapStorage::default());
    let found = store
        .get(NetworkEnvironment::Mainnet, &AccountAddress::new("0xAAA"))
        .expect("lookup");
    assert!(found.is_none());
}

#[test]
fn keys_never_cross_environments() {
    let store = KeyStore::new(MapStorage::default());
    let address = AccountAddress::new("0xAAA");
    store
        .set(NetworkEnvironment::Mainnet, &address, key(1))
        .expect("set mainnet");

    assert_eq!(
        store.get(NetworkEnvironment::Mainnet, &address).expect("mainnet"),
        Some(key(1))
    );
    assert_eq!(
        store.get(NetworkEnvironment::Testnet, &address).expect("testnet"),
        None
    );
}

#[test]
fn set_overwrites_existing_key() {
    let store = KeyStore::new(MapStorage::default());
    let address = AccountAddress::new("0xAAA");
    store
        .set(NetworkEnvironment::Mainnet, &address, key(1))
        .expect("first set");
    store
        .set(NetworkEnvironment::Mainnet, &address, key(2))
        .expect("second set");
    assert_eq!(
        store.get(NetworkEnvironment::Mainnet, &address).expect("get"),
        Some(key(2))
    );
}

#[test]
fn addresses_are_case_normalized() {
    let store = KeyStore::new(MapStorage::default());
    store
        .set(NetworkEnvironment::Testnet, &AccountAddress::new("0xAbC"), key(3))
        .expect("set");
    assert_eq!(
        store
            .get(NetworkEnvironment::Testnet, &AccountAddress::new(" 0xabc "))
            .expect("get"),
        Some(key(3))
    );
}

#[test]
fn keys_survive_a_new_store_over_the_same_storage() {
    let storage = Arc::new(MapStorage::default());
    let address = AccountAddress::new("0xAAA");
    KeyStore::new(storage.clone())
        .set(NetworkEnvironment::Mainnet, &address, key(7))
        .expect("set");

    let reopened = KeyStore::new(storage.clone());
    assert_eq!(
        reopened.get(NetworkEnvironment::Mainnet, &address).expect("get"),
        Some(key(7))
    );

    let raw = storage
        .get_string(DEFAULT_KEY_NAMESPACE)
        .expect("read raw")
        .expect("blob present");
    let blob: serde_json::Value = serde_json::from_str(&raw).expect("json blob");
    assert!(blob["mainnet"]["0xaaa"].is_string());
    assert!(blob.get("testnet").is_none());
}

#[test]
fn unknown_environments_in_blob_are_ignored() {
    let storage = MapStorage::default();
    let leaked = format!(
        r#"{{"staging":{{"0xaaa":"{}"}},"mainnet":{{}}}}"#,
        B256::repeat_byte(9)
    );
    storage
        .set_string(DEFAULT_KEY_NAMESPACE, &leaked)
        .expect("seed blob");
    let store = KeyStore::new(storage);
    for network in NetworkEnvironment::ALL {
        assert_eq!(
            store.get(network, &AccountAddress::new("0xaaa")).expect("get"),
            None
        );
    }
}

#[test]
fn remove_and_list_addresses() {
    let store = KeyStore::new(MapStorage::default());
    let a = AccountAddress::new("0xAAA");
    let b = AccountAddress::new("0xBBB");
    store.set(NetworkEnvironment::Mainnet, &a, key(1)).expect("set a");
    store.set(NetworkEnvironment::Mainnet, &b, key(2)).expect("set b");
    assert_eq!(
        store.addresses(NetworkEnvironment::Mainnet).expect("list"),
        vec![a.clone(), b.clone()]
    );

    assert!(store.remove(NetworkEnvironment::Mainnet, &a).expect("remove a"));
    assert!(!store.remove(NetworkEnvironment::Mainnet, &a).expect("remove again"));
    assert_eq!(store.get(NetworkEnvironment::Mainnet, &a).expect("get a"), None);
    assert_eq!(
        store.get(NetworkEnvironment::Mainnet, &b).expect("get b"),
        Some(key(2))
    );
}

#[test]
fn storage_failure_is_distinct_from_absence() {
    let store = KeyStore::new(OfflineStorage);
    let address = AccountAddress::new("0xAAA");
    let err = store
        .get(NetworkEnvironment::Mainnet, &address)
        .expect_err("read must fail");
    assert!(matches!(err, KeyStoreError::StorageUnavailable(_)));

    let err = store
        .set(NetworkEnvironment::Mainnet, &address, key(1))
        .expect_err("write must fail");
    assert!(matches!(err, KeyStoreError::StorageUnavailable(_)));
}

#[test]
fn corrupt_blob_is_reported() {
    let storage = MapStorage::default();
    storage
        .set_string(DEFAULT_KEY_NAMESPACE, "{not json")
        .expect("seed");
    let store = KeyStore::new(storage);
    let err = store
        .get(NetworkEnvironment::Testnet, &AccountAddress::new("0xAAA"))
        .expect_err("corrupt");
    assert!(matches!(err, KeyStoreError::Corrupt(_)));
}

#[test]
fn custom_namespace_leaves_other_state_alone() {
    let storage = Arc::new(MapStorage::default());
    storage.set_string("app.theme", "dark").expect("seed");
    let store = KeyStore::with_namespace(storage.clone(), "wallet.keys");
    store
        .set(NetworkEnvironment::Mainnet, &AccountAddress::new("0xAAA"), key(1))
        .expect("set");
    assert_eq!(
        storage.get_string("app.theme").expect("theme"),
        Some("dark".to_owned())
    );
    assert!(storage.get_string("wallet.keys").expect("keys").is_some());
}

#[test]
fn concurrent_writers_never_tear_the_blob() {
    let store = Arc::new(KeyStore::new(MapStorage::default()));
    let handles: Vec<_> = (0u8..8)
        .map(|seed| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let address = AccountAddress::new(format!("0x{seed:03}"));
                for round in 0u8..10 {
                    store
                        .set(NetworkEnvironment::Mainnet, &address, key(seed.wrapping_add(round)))
                        .expect("set");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }
    let addresses = store.addresses(NetworkEnvironment::Mainnet).expect("list");
    assert_eq!(addresses.len(), 8);
    for seed in 0u8..8 {
        let address = AccountAddress::new(format!("0x{seed:03}"));
        assert_eq!(
            store.get(NetworkEnvironment::Mainnet, &address).expect("get"),
            Some(key(seed.wrapping_add(9)))
        );
    }
}

#[test]
fn preference_defaults_then_persists() {
    let storage = Arc::new(MapStorage::default());
    let preference = NetworkPreference::new(storage.clone(), NetworkEnvironment::Mainnet);
    assert_eq!(preference.get().expect("default"), NetworkEnvironment::Mainnet);
    preference.set(NetworkEnvironment::Testnet).expect("set");
    let reopened = NetworkPreference::new(storage, NetworkEnvironment::Mainnet);
    assert_eq!(reopened.get().expect("stored"), NetworkEnvironment::Testnet);
}

#[test]
fn unreadable_preference_is_its_own_error() {
    let storage = Arc::new(MapStorage::default());
    let preference = NetworkPreference::new(storage.clone(), NetworkEnvironment::Mainnet);
    storage
        .set_string(DEFAULT_NETWORK_PREFERENCE_KEY, "\"devnet\"")
        .expect("seed");
    let err = preference.get().expect_err("unknown network");
    assert!(matches!(err, PreferenceError::Corrupt(_)));
    assert!(err.to_string().contains("network preference"));

    let offline = NetworkPreference::new(OfflineStorage, NetworkEnvironment::Mainnet);
    let err = offline.get().expect_err("read must fail");
    assert!(matches!(err, PreferenceError::StorageUnavailable(_)));
    let err = offline
        .set(NetworkEnvironment::Testnet)
        .expect_err("write must fail");
    assert!(matches!(err, PreferenceError::StorageUnavailable(_)));
}

#[test]
fn debug_output_redacts_keys() {
    let rendered = format!("{:?}", key(0xab));
    assert!(!rendered.contains("abab"));
}
