use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

/// Key-value store with per-entry expiry.
///
/// Entries are lazily invalidated: a stale entry is simply never returned and
/// is overwritten by the next put for its key. There is no capacity bound and
/// no eviction beyond the TTL; the key space is bounded by the set of distinct
/// query-parameter combinations. Concurrent fetches for the same key may race
/// and both hit upstream, which is tolerated (no single-flight).
pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Store a value under `key`, unconditionally replacing any prior entry
    /// and restarting its TTL clock.
    pub async fn put(&self, key: &str, value: T) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return the stored value if its age is strictly below the TTL.
    pub async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        entries.get(key).and_then(|entry| {
            if entry.inserted_at.elapsed() < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }
}
