use async_trait::async_trait;
use property_scout::favorites::{
    FavoritesOptions, FavoritesStore, FileStorage, KeyValueStorage, MemoryStorage, StorageError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

fn fast_retries() -> FavoritesOptions {
    FavoritesOptions {
        retry_backoff: Duration::from_millis(1),
        ..FavoritesOptions::default()
    }
}

/// Storage that fails a fixed number of writes before succeeding
struct FlakyStorage {
    inner: MemoryStorage,
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl FlakyStorage {
    fn failing(times: usize) -> Self {
        Self {
            inner: MemoryStorage::new(),
            failures_left: AtomicUsize::new(times),
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl KeyValueStorage for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value).await
    }
}

/// Storage that records every write and takes a while to do it
#[derive(Default)]
struct SlowRecordingStorage {
    writes: Mutex<Vec<String>>,
}

#[async_trait]
impl KeyValueStorage for SlowRecordingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, value: &str) -> Result<(), StorageError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.writes.lock().unwrap().push(value.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn favorites_survive_restart() {
    let dir = tempdir().unwrap();

    {
        let store =
            FavoritesStore::load(Arc::new(FileStorage::new(dir.path())), fast_retries()).await;
        store.toggle("melb-fitzroy-1");
        store.add("syd-paddington-3");
        store.toggle("bris-newfarm-4");
        store.toggle("bris-newfarm-4");
        store.flush().await;
    }

    let reloaded =
        FavoritesStore::load(Arc::new(FileStorage::new(dir.path())), fast_retries()).await;
    assert_eq!(reloaded.ids(), vec!["melb-fitzroy-1", "syd-paddington-3"]);
    assert!(!reloaded.is_favorite("bris-newfarm-4"));
}

#[tokio::test]
async fn corrupt_file_falls_back_to_empty() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("favorites.json"), "[\"a\", ").unwrap();

    let store = FavoritesStore::load(Arc::new(FileStorage::new(dir.path())), fast_retries()).await;
    assert!(store.is_empty());

    // Next mutation overwrites the unreadable snapshot
    store.add("b");
    store.flush().await;
    let raw = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
    assert_eq!(raw, r#"["b"]"#);
}

#[tokio::test]
async fn failed_writes_are_retried_without_rolling_back() {
    let storage = Arc::new(FlakyStorage::failing(2));
    let store = FavoritesStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>, fast_retries())
        .await;

    assert!(store.toggle("A"));
    assert!(store.is_favorite("A"));
    store.flush().await;

    assert_eq!(storage.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(storage.get("favorites").await.unwrap().as_deref(), Some(r#"["A"]"#));
}

#[tokio::test]
async fn exhausted_retries_keep_memory_state() {
    let storage = Arc::new(FlakyStorage::failing(10));
    let store = FavoritesStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>, fast_retries())
        .await;

    store.add("A");
    store.flush().await;

    assert!(store.is_favorite("A"));
    assert_eq!(storage.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(storage.get("favorites").await.unwrap(), None);
}

#[tokio::test]
async fn rapid_mutations_end_with_latest_state() {
    let storage = Arc::new(SlowRecordingStorage::default());
    let store = Arc::new(
        FavoritesStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>, fast_retries())
            .await,
    );

    let mut tasks = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store.add(&format!("p{}", i));
            // Odd number of toggles on a shared id from every task
            store.toggle("shared");
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    store.flush().await;

    // 8 toggles: even parity, so "shared" ends where it started
    assert!(!store.is_favorite("shared"));
    assert_eq!(store.len(), 8);

    let writes = storage.writes.lock().unwrap();
    let last: Vec<String> = serde_json::from_str(writes.last().unwrap()).unwrap();
    assert_eq!(last, store.ids());
    // Coalesced: never more writes than mutations
    assert!(writes.len() <= 16);
}

#[tokio::test]
async fn flush_without_changes_returns() {
    let store = FavoritesStore::load(Arc::new(MemoryStorage::new()), fast_retries()).await;
    store.flush().await;
    assert!(store.is_empty());
}
