// tests/store_tests.rs
use scorenav::history::collator::Collator;
use scorenav::history::error::HistoryError;
use scorenav::history::store::{HistoryStore, RECORDS_KEY, SNAPSHOT_KEY};
use scorenav::persist::{MemoryStore, StateStore};
use scorenav::position::Position;

const MAX: usize = 40;

fn store_over(backend: &MemoryStore) -> HistoryStore {
    HistoryStore::new(Box::new(backend.clone()))
}

fn log(store: &mut HistoryStore, staff: u32, measure: u32) {
    store
        .active_mut()
        .log(Position::new(staff, measure), &Collator::default(), MAX);
}

#[test]
fn test_switch_creates_empty_state_lazily() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);
    store.switch_active("sonata.mscz");
    assert_eq!(store.active_key(), Some("sonata.mscz"));
    assert!(store.active().is_empty());
}

#[test]
fn test_switch_to_same_key_is_a_no_op() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);
    store.switch_active("a");
    log(&mut store, 0, 1);
    log(&mut store, 0, 5);
    store.switch_active("a");
    assert_eq!(store.active().back_len(), 1);
    assert_eq!(store.active().current(), Some(&Position::new(0, 5)));
}

#[test]
fn test_switching_documents_keeps_histories_independent() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);

    store.switch_active("a");
    log(&mut store, 0, 1);
    log(&mut store, 0, 5);

    store.switch_active("b");
    assert!(store.active().is_empty());
    log(&mut store, 0, 20);

    store.switch_active("a");
    assert_eq!(store.active().back_records(), &[Position::new(0, 1)]);
    assert_eq!(store.active().current(), Some(&Position::new(0, 5)));
    assert_eq!(store.document("b").unwrap().current(), Some(&Position::new(0, 20)));
}

#[test]
fn test_clear_on_one_document_leaves_the_other_alone() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);

    store.switch_active("a");
    log(&mut store, 0, 1);
    log(&mut store, 0, 5);
    store.switch_active("b");
    log(&mut store, 0, 7);

    store.switch_active("a");
    store.active_mut().clear();

    assert!(store.active().is_empty());
    assert_eq!(store.document("b").unwrap().current(), Some(&Position::new(0, 7)));
}

#[test]
fn test_save_load_round_trip() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);

    store.switch_active("a");
    log(&mut store, 0, 1);
    log(&mut store, 0, 5);
    store.switch_active("b");
    log(&mut store, 2, 9);
    store.save().unwrap();

    let mut reloaded = store_over(&backend);
    reloaded.load(false).unwrap();
    reloaded.switch_active("a");
    assert_eq!(reloaded.active().back_records(), &[Position::new(0, 1)]);
    assert_eq!(reloaded.active().current(), Some(&Position::new(0, 5)));
    assert_eq!(
        reloaded.document("b").unwrap().current(),
        Some(&Position::new(2, 9))
    );
}

#[test]
fn test_load_with_no_persisted_data_yields_empty_mapping() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);
    store.load(false).unwrap();
    store.switch_active("anything");
    assert!(store.active().is_empty());
}

#[test]
fn test_load_with_malformed_blob_reports_and_stays_empty() {
    let mut backend = MemoryStore::new();
    backend.save_value(RECORDS_KEY, "not json at all").unwrap();

    let mut store = store_over(&backend);
    let err = store.load(false).unwrap_err();
    assert!(matches!(err, HistoryError::MalformedPersistedState { .. }));
    store.switch_active("a");
    assert!(store.active().is_empty());
}

#[test]
fn test_null_stack_entries_are_dropped_and_reported() {
    let mut backend = MemoryStore::new();
    let blob = r#"{"a":{"back_stack":[{"staff_index":0,"measure_number":1},null],"forward_stack":[],"current":{"staff_index":0,"measure_number":5}}}"#;
    backend.save_value(RECORDS_KEY, blob).unwrap();

    let mut store = store_over(&backend);
    let err = store.load(false).unwrap_err();
    assert!(matches!(err, HistoryError::MalformedPersistedState { .. }));

    // The usable entries survive; only the nulls are gone.
    let history = store.document("a").unwrap();
    assert_eq!(history.back_records(), &[Position::new(0, 1)]);
    assert_eq!(history.current(), Some(&Position::new(0, 5)));
}

#[test]
fn test_null_stack_entries_repair_silently_when_enabled() {
    let mut backend = MemoryStore::new();
    let blob = r#"{"a":{"back_stack":[null,{"staff_index":1,"measure_number":3}],"forward_stack":[null],"current":null}}"#;
    backend.save_value(RECORDS_KEY, blob).unwrap();

    let mut store = store_over(&backend);
    store.load(true).unwrap();
    let history = store.document("a").unwrap();
    assert_eq!(history.back_records(), &[Position::new(1, 3)]);
    assert_eq!(history.forward_len(), 0);
}

#[test]
fn test_read_only_store_never_writes() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);
    store.set_read_only(true);
    store.switch_active("a");
    log(&mut store, 0, 1);
    store.save().unwrap();
    store.write_snapshot().unwrap();
    assert!(backend.is_empty());
}

#[test]
fn test_snapshot_round_trip_and_single_consumption() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);
    store.switch_active("a");
    log(&mut store, 0, 1);
    log(&mut store, 0, 5);
    store.write_snapshot().unwrap();

    let snapshot = store.take_snapshot().unwrap().unwrap();
    assert_eq!(snapshot.document, "a");
    assert_eq!(snapshot.back_stack, vec![Position::new(0, 1)]);
    assert_eq!(snapshot.current, Some(Position::new(0, 5)));

    // Consumed: a second read finds nothing.
    assert!(store.take_snapshot().unwrap().is_none());
    assert!(backend.load_value(SNAPSHOT_KEY).unwrap().is_none());
}

#[test]
fn test_snapshot_for_other_document_is_left_in_place() {
    let backend = MemoryStore::new();
    let mut store = store_over(&backend);
    store.switch_active("a");
    log(&mut store, 0, 1);
    store.write_snapshot().unwrap();

    store.switch_active("b");
    assert!(store.take_snapshot().unwrap().is_none());
    assert!(backend.load_value(SNAPSHOT_KEY).unwrap().is_some());

    // Switching back makes it interpretable again.
    store.switch_active("a");
    assert!(store.take_snapshot().unwrap().is_some());
}

#[test]
fn test_observer_consumption_does_not_clear_snapshot() {
    let backend = MemoryStore::new();
    let mut writer = store_over(&backend);
    writer.switch_active("a");
    log(&mut writer, 0, 1);
    writer.write_snapshot().unwrap();

    let mut observer = store_over(&backend);
    observer.set_read_only(true);
    observer.switch_active("a");
    assert!(observer.take_snapshot().unwrap().is_some());
    // Clearing would be a write; the blob must survive an observer's read.
    assert!(backend.load_value(SNAPSHOT_KEY).unwrap().is_some());

    // But the observer itself never interprets the same snapshot twice.
    assert!(observer.take_snapshot().unwrap().is_none());

    // A fresh snapshot written afterwards is interpretable again.
    writer.active_mut().clear();
    writer
        .active_mut()
        .log(Position::new(0, 9), &Collator::default(), MAX);
    writer.write_snapshot().unwrap();
    assert!(observer.take_snapshot().unwrap().is_some());
}

#[test]
fn test_malformed_snapshot_is_cleared_and_reported() {
    let mut backend = MemoryStore::new();
    backend.save_value(SNAPSHOT_KEY, "{broken").unwrap();

    let mut store = store_over(&backend);
    store.switch_active("a");
    let err = store.take_snapshot().unwrap_err();
    assert!(matches!(err, HistoryError::MalformedPersistedState { .. }));
    assert!(backend.load_value(SNAPSHOT_KEY).unwrap().is_none());
}
