mod common;

use shielder_adapters::FileStorageAdapter;
use shielder_core::{AccountAddress, KeyStore, NetworkEnvironment, StoragePort};

use common::{init_tracing, key, scratch_dir};

#[test]
fn missing_document_reads_as_empty() {
    init_tracing();
    let dir = scratch_dir("file-empty");
    let storage = FileStorageAdapter::open(dir.join("store.json")).expect("open");
    assert_eq!(storage.get_string("anything").expect("get"), None);
    assert!(!storage.path().exists());
}

#[test]
fn values_survive_reopen() {
    init_tracing();
    let dir = scratch_dir("file-reopen");
    let path = dir.join("nested").join("store.json");
    {
        let storage = FileStorageAdapter::open(&path).expect("open");
        storage.set_string("a", "1").expect("set a");
        storage.set_string("b", "2").expect("set b");
        storage.remove("a").expect("remove a");
    }
    let reopened = FileStorageAdapter::open(&path).expect("reopen");
    assert_eq!(reopened.get_string("a").expect("get a"), None);
    assert_eq!(reopened.get_string("b").expect("get b"), Some("2".to_owned()));
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn key_store_persists_across_restart() {
    init_tracing();
    let dir = scratch_dir("file-keys");
    let path = dir.join("store.json");
    let address = AccountAddress::new("0xAAA");
    KeyStore::new(FileStorageAdapter::open(&path).expect("open"))
        .set(NetworkEnvironment::Testnet, &address, key(4))
        .expect("set");

    let restarted = KeyStore::new(FileStorageAdapter::open(&path).expect("reopen"));
    assert_eq!(
        restarted.get(NetworkEnvironment::Testnet, &address).expect("get"),
        Some(key(4))
    );
    assert_eq!(
        restarted.get(NetworkEnvironment::Mainnet, &address).expect("get"),
        None
    );
}

#[test]
fn garbage_document_is_an_error_not_absence() {
    init_tracing();
    let dir = scratch_dir("file-garbage");
    let path = dir.join("store.json");
    let storage = FileStorageAdapter::open(&path).expect("open");
    std::fs::write(&path, b"not json").expect("write garbage");
    assert!(storage.get_string("a").is_err());
}

#[test]
fn scratch_dir_is_removed_with_its_contents() {
    init_tracing();
    let dir = scratch_dir("file-cleanup");
    let root = dir.path().to_path_buf();
    let storage = FileStorageAdapter::open(dir.join("nested").join("store.json")).expect("open");
    storage.set_string("a", "1").expect("set");
    assert!(storage.path().exists());
    drop(storage);
    drop(dir);
    assert!(!root.exists());
}
