// tests/persist_tests.rs
use scorenav::persist::{FileStore, MemoryStore, StateStore};

#[test]
fn test_memory_store_round_trip() {
    let mut store = MemoryStore::new();
    assert!(store.load_value("k").unwrap().is_none());
    store.save_value("k", "v").unwrap();
    assert_eq!(store.load_value("k").unwrap().as_deref(), Some("v"));
    store.remove_value("k").unwrap();
    assert!(store.load_value("k").unwrap().is_none());
}

#[test]
fn test_memory_store_clones_share_state() {
    let mut store = MemoryStore::new();
    let clone = store.clone();
    store.save_value("k", "v").unwrap();
    assert_eq!(clone.load_value("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();

    assert!(store.load_value("scorenav.history.records").unwrap().is_none());
    store
        .save_value("scorenav.history.records", "{\"a\":1}")
        .unwrap();
    assert_eq!(
        store
            .load_value("scorenav.history.records")
            .unwrap()
            .as_deref(),
        Some("{\"a\":1}")
    );
}

#[test]
fn test_file_store_overwrites_previous_value() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store.save_value("k", "first").unwrap();
    store.save_value("k", "second").unwrap();
    assert_eq!(store.load_value("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn test_file_store_remove() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store.save_value("k", "v").unwrap();
    store.remove_value("k").unwrap();
    assert!(store.load_value("k").unwrap().is_none());
    // Removing an absent key is fine.
    store.remove_value("k").unwrap();
}

#[test]
fn test_file_store_flattens_hostile_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store.save_value("../escape/attempt", "v").unwrap();
    assert_eq!(
        store.load_value("../escape/attempt").unwrap().as_deref(),
        Some("v")
    );
    // Everything stays inside the store directory.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_file_store_keeps_similar_keys_distinct() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store.save_value("a/b", "slash").unwrap();
    store.save_value("a_b", "underscore").unwrap();
    assert_eq!(store.load_value("a/b").unwrap().as_deref(), Some("slash"));
    assert_eq!(
        store.load_value("a_b").unwrap().as_deref(),
        Some("underscore")
    );
}

#[test]
fn test_file_store_reopens_existing_state() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = FileStore::new(dir.path()).unwrap();
        store.save_value("k", "persisted").unwrap();
    }
    let store = FileStore::new(dir.path()).unwrap();
    assert_eq!(store.load_value("k").unwrap().as_deref(), Some("persisted"));
}
