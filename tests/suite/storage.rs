//! Token persistence through the file-backed key/value store.

use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use taskdesk_client::{FileStore, KeyValueStore, SessionContext, TOKEN_KEY};

#[test]
fn token_is_stored_as_a_json_string() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let session = SessionContext::new(Arc::new(FileStore::new(&path)));
    session.set_token("abc.def").unwrap();

    let raw = FileStore::new(&path).get(TOKEN_KEY).unwrap();
    assert_eq!(raw.as_deref(), Some("\"abc.def\""));

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[TOKEN_KEY], "\"abc.def\"");
}

#[test]
fn corrupt_storage_starts_signed_out() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, "{ not json").unwrap();

    let session = SessionContext::new(Arc::new(FileStore::new(&path)));
    assert!(!session.is_authenticated());
}

#[test]
fn other_keys_survive_a_logout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let store = Arc::new(FileStore::new(&path));
    store.set("theme", "dark").unwrap();

    let session = SessionContext::new(store.clone());
    session.set_token("tok").unwrap();
    session.clear().unwrap();

    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}
