use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use todos_core::{
    decode_snapshot, encode_snapshot, Item, KeyValueStore, MemoryKeyValueStore,
    PersistenceAdapter, SnapshotError, SnapshotWriter, StorageError, StorageResult, SNAPSHOT_KEY,
};

/// Memory store whose first `failures` writes fail.
#[derive(Clone)]
struct FlakyStore {
    inner: MemoryKeyValueStore,
    failures: Arc<AtomicUsize>,
}

impl FlakyStore {
    fn failing(failures: usize) -> Self {
        Self {
            inner: MemoryKeyValueStore::new(),
            failures: Arc::new(AtomicUsize::new(failures)),
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StorageError::Poisoned);
        }
        self.inner.set_item(key, value)
    }
}

/// Memory store whose first write parks until the test releases it.
#[derive(Clone)]
struct GatedStore {
    inner: MemoryKeyValueStore,
    gate_armed: Arc<AtomicBool>,
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

impl GatedStore {
    fn new() -> Self {
        Self {
            inner: MemoryKeyValueStore::new(),
            gate_armed: Arc::new(AtomicBool::new(true)),
            entered: Arc::new(Barrier::new(2)),
            release: Arc::new(Barrier::new(2)),
        }
    }
}

impl KeyValueStore for GatedStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.gate_armed.swap(false, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        self.inner.set_item(key, value)
    }
}

fn sample_items() -> Vec<Item> {
    vec![
        Item::new(1_700_000_000_000, "buy milk"),
        Item::new(1_700_000_000_001, ""),
        Item::new(1_700_000_000_002, "naïve café ✓"),
    ]
}

#[test]
fn save_then_load_is_lossless() {
    let store = MemoryKeyValueStore::new();
    let adapter = PersistenceAdapter::new(store.clone());

    adapter.save(&sample_items()).unwrap();

    assert_eq!(adapter.load(), sample_items());
    let raw = store.get_item(SNAPSHOT_KEY).unwrap().unwrap();
    assert_eq!(decode_snapshot(&raw).unwrap(), sample_items());
}

#[test]
fn snapshot_wire_shape_is_array_of_id_text() {
    let json = encode_snapshot(&sample_items()[..1]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "id": 1_700_000_000_000_i64, "text": "buy milk" }])
    );
}

#[test]
fn load_without_stored_value_is_empty() {
    let adapter = PersistenceAdapter::new(MemoryKeyValueStore::new());
    assert!(adapter.try_load().unwrap().is_none());
    assert!(adapter.load().is_empty());
}

#[test]
fn malformed_snapshot_fails_open_to_empty_list() {
    let adapter = PersistenceAdapter::new(MemoryKeyValueStore::with_item(SNAPSHOT_KEY, "{not json"));

    assert!(matches!(adapter.try_load(), Err(SnapshotError::Decode(_))));
    assert!(adapter.load().is_empty());
}

#[test]
fn save_retries_one_failed_write() {
    let store = FlakyStore::failing(1);
    let adapter = PersistenceAdapter::new(store.clone());

    adapter.save(&sample_items()).unwrap();

    assert!(store.inner.get_item(SNAPSHOT_KEY).unwrap().is_some());
}

#[test]
fn save_gives_up_after_the_retry() {
    let store = FlakyStore::failing(2);
    let adapter = PersistenceAdapter::new(store.clone());

    let err = adapter.save(&sample_items()).unwrap_err();

    assert!(matches!(err, SnapshotError::Storage(StorageError::Poisoned)));
    assert!(store.inner.get_item(SNAPSHOT_KEY).unwrap().is_none());
}

#[test]
fn writer_persists_the_latest_submission() {
    let store = MemoryKeyValueStore::new();
    let writer = SnapshotWriter::spawn(PersistenceAdapter::new(store.clone())).unwrap();
    let sink = writer.sink();

    let mut items = Vec::new();
    for id in 0..50 {
        items.push(Item::new(id, format!("item {id}")));
        assert!(sink.submit(items.clone()));
    }
    assert!(writer.flush());

    let raw = store.get_item(SNAPSHOT_KEY).unwrap().unwrap();
    assert_eq!(decode_snapshot(&raw).unwrap(), items);
    assert!(writer.written_snapshots() >= 1);
    assert!(writer.written_snapshots() <= 50);
    assert_eq!(writer.failed_writes(), 0);
}

#[test]
fn snapshots_queued_behind_a_slow_write_collapse_into_one() {
    let store = GatedStore::new();
    let writer = SnapshotWriter::spawn(PersistenceAdapter::new(store.clone())).unwrap();
    let sink = writer.sink();

    assert!(sink.submit(vec![Item::new(0, "first")]));
    store.entered.wait();

    let mut items = vec![Item::new(0, "first")];
    for id in 1..=5 {
        items.push(Item::new(id, format!("queued {id}")));
        assert!(sink.submit(items.clone()));
    }
    store.release.wait();
    assert!(writer.flush());

    assert_eq!(writer.written_snapshots(), 2);
    assert_eq!(writer.failed_writes(), 0);
    let raw = store.inner.get_item(SNAPSHOT_KEY).unwrap().unwrap();
    assert_eq!(decode_snapshot(&raw).unwrap(), items);
}

#[test]
fn writer_counts_failed_writes_and_keeps_running() {
    let store = FlakyStore::failing(2);
    let writer = SnapshotWriter::spawn(PersistenceAdapter::new(store.clone())).unwrap();
    let sink = writer.sink();

    sink.submit(vec![Item::new(1, "lost")]);
    assert!(writer.flush());
    assert_eq!(writer.failed_writes(), 1);

    sink.submit(vec![Item::new(2, "kept")]);
    assert!(writer.flush());

    let raw = store.inner.get_item(SNAPSHOT_KEY).unwrap().unwrap();
    assert_eq!(decode_snapshot(&raw).unwrap(), vec![Item::new(2, "kept")]);
}

#[test]
fn dropping_the_writer_drains_pending_snapshots() {
    let store = MemoryKeyValueStore::new();
    let writer = SnapshotWriter::spawn(PersistenceAdapter::new(store.clone())).unwrap();
    let sink = writer.sink();

    sink.submit(vec![Item::new(7, "before shutdown")]);
    drop(writer);

    let raw = store.get_item(SNAPSHOT_KEY).unwrap().unwrap();
    assert_eq!(decode_snapshot(&raw).unwrap(), vec![Item::new(7, "before shutdown")]);
    assert!(!sink.submit(vec![Item::new(8, "too late")]));
}
