use crate::favorites::storage::KeyValueStorage;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

/// Storage key used when none is configured
pub const DEFAULT_FAVORITES_KEY: &str = "favorites";

/// Upper bound on the wait between write attempts
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Persistence settings for a [`FavoritesStore`]
#[derive(Debug, Clone)]
pub struct FavoritesOptions {
    /// Key the whole set is stored under
    pub key: String,
    /// Attempts per write before giving up until the next mutation
    pub write_attempts: u32,
    /// Delay before the first retry; grows linearly per attempt
    pub retry_backoff: Duration,
}

impl Default for FavoritesOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_FAVORITES_KEY.to_string(),
            write_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

enum WriteRequest {
    Persist,
    Flush(oneshot::Sender<()>),
}

/// Durable set of favorite property ids.
///
/// Reads and mutations are synchronous against the in-memory set. Every
/// effective mutation queues a write of the full set to a single background
/// writer, so writes never race and the last one always carries every
/// mutation made before it. A failed write is retried and then logged; the
/// in-memory set stays authoritative.
///
/// Must be created inside a tokio runtime.
pub struct FavoritesStore {
    ids: Arc<RwLock<HashSet<String>>>,
    revision: watch::Sender<u64>,
    writer: mpsc::UnboundedSender<WriteRequest>,
}

impl FavoritesStore {
    /// Load the persisted set and start the writer.
    ///
    /// Missing or unreadable data yields an empty set rather than an error.
    pub async fn load(storage: Arc<dyn KeyValueStorage>, options: FavoritesOptions) -> Self {
        let initial = match storage.get(&options.key).await {
            Ok(Some(raw)) => parse_snapshot(&raw, &options.key),
            Ok(None) => {
                debug!("No saved favorites under {:?}, starting empty", options.key);
                HashSet::new()
            }
            Err(e) => {
                warn!("Failed to read favorites, starting empty: {}", e);
                HashSet::new()
            }
        };

        info!("Loaded {} favorites", initial.len());

        let ids = Arc::new(RwLock::new(initial));
        let (writer, rx) = mpsc::unbounded_channel();
        let (revision, _) = watch::channel(0);

        tokio::spawn(run_writer(Arc::clone(&ids), storage, options, rx));

        Self {
            ids,
            revision,
            writer,
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.read().contains(id)
    }

    /// Flip membership of `id`. Returns whether it is a favorite afterwards.
    pub fn toggle(&self, id: &str) -> bool {
        let now_favorite = {
            let mut ids = self.write();
            if ids.remove(id) {
                false
            } else {
                ids.insert(id.to_string());
                true
            }
        };
        debug!("Toggled favorite {} -> {}", id, now_favorite);
        self.changed();
        now_favorite
    }

    /// Mark `id` as a favorite. Returns false if it already was.
    pub fn add(&self, id: &str) -> bool {
        let inserted = self.write().insert(id.to_string());
        if inserted {
            self.changed();
        }
        inserted
    }

    /// Unmark `id`. Returns false if it was not a favorite.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.write().remove(id);
        if removed {
            self.changed();
        }
        removed
    }

    /// Sorted snapshot of the favorite ids
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Receiver that observes a new revision after every effective mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current mutation revision, starts at 0 after load
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Wait until every mutation made so far has been written, or its
    /// write attempts are exhausted.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.writer.send(WriteRequest::Flush(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }

    fn changed(&self) {
        self.revision.send_modify(|rev| *rev += 1);
        if self.writer.send(WriteRequest::Persist).is_err() {
            warn!("Favorites writer has stopped, change kept in memory only");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashSet<String>> {
        self.ids.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<String>> {
        self.ids.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_snapshot(raw: &str, key: &str) -> HashSet<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            warn!("Saved favorites under {:?} are unreadable, starting empty: {}", key, e);
            HashSet::new()
        }
    }
}

fn serialize_snapshot(ids: &RwLock<HashSet<String>>) -> Result<String, serde_json::Error> {
    let mut sorted: Vec<String> = ids
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect();
    sorted.sort();
    serde_json::to_string(&sorted)
}

async fn run_writer(
    ids: Arc<RwLock<HashSet<String>>>,
    storage: Arc<dyn KeyValueStorage>,
    options: FavoritesOptions,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(request) = rx.recv().await {
        let mut dirty = false;
        let mut waiters = Vec::new();

        // Coalesce everything already queued into one write
        let mut next = Some(request);
        while let Some(request) = next {
            match request {
                WriteRequest::Persist => dirty = true,
                WriteRequest::Flush(done) => waiters.push(done),
            }
            next = rx.try_recv().ok();
        }

        if dirty {
            persist(&ids, storage.as_ref(), &options).await;
        }

        for done in waiters {
            let _ = done.send(());
        }
    }

    debug!("Favorites writer stopped");
}

async fn persist(
    ids: &RwLock<HashSet<String>>,
    storage: &dyn KeyValueStorage,
    options: &FavoritesOptions,
) {
    let attempts = options.write_attempts.max(1);

    for attempt in 1..=attempts {
        // Snapshot per attempt so a retry never writes older state
        let payload = match serialize_snapshot(ids) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        match storage.set(&options.key, &payload).await {
            Ok(()) => {
                debug!("Persisted favorites ({} bytes)", payload.len());
                return;
            }
            Err(e) if attempt < attempts => {
                warn!(
                    "Favorites write attempt {}/{} failed: {}",
                    attempt, attempts, e
                );
                tokio::time::sleep(retry_delay(options.retry_backoff, attempt)).await;
            }
            Err(e) => {
                error!(
                    "Giving up on favorites write after {} attempts: {}",
                    attempts, e
                );
            }
        }
    }
}

/// Linear backoff, saturating and capped at [`MAX_RETRY_DELAY`]
fn retry_delay(backoff: Duration, attempt: u32) -> Duration {
    backoff.saturating_mul(attempt).min(MAX_RETRY_DELAY)
}
