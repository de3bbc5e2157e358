mod common;

use shielder_adapters::MemoryStorageAdapter;
use shielder_core::{AccountAddress, KeyStore, NetworkEnvironment, StoragePort};

use common::key;

#[test]
fn clones_share_state() {
    let a = MemoryStorageAdapter::default();
    let b = a.clone();
    a.set_string("k", "v").expect("set");
    assert_eq!(b.get_string("k").expect("get"), Some("v".to_owned()));
    b.remove("k").expect("remove");
    assert!(a.is_empty().expect("empty"));
}

#[test]
fn key_store_namespace_is_the_only_key_written() {
    let storage = MemoryStorageAdapter::default();
    KeyStore::new(storage.clone())
        .set(NetworkEnvironment::Mainnet, &AccountAddress::new("0xAAA"), key(1))
        .expect("set");
    assert_eq!(storage.len().expect("len"), 1);
}
