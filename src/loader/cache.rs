//! Process-lifetime cache of parsed JSON files.
//!
//! Keys are project-relative paths (`src/data/imports/genres.json`). Entries
//! are created on first reference and never evicted: a build that wants fresh
//! data starts a new [`ImportCache`].
//!
//! # Thread Safety
//!
//! Entries live behind a `RwLock` so many page loads can read concurrently.
//! [`ImportCache::get_or_load`] adds an in-flight map so concurrent misses on
//! the same key share one read instead of each hitting the disk.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::pocket::Pocket;

/// A cached file: either a raw import fragment or an assembled page.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Json(Arc<Value>),
    Page(Arc<Pocket>),
}

impl CacheEntry {
    pub fn as_json(&self) -> Option<&Arc<Value>> {
        match self {
            Self::Json(value) => Some(value),
            Self::Page(_) => None,
        }
    }

    pub fn as_page(&self) -> Option<&Arc<Pocket>> {
        match self {
            Self::Page(pocket) => Some(pocket),
            Self::Json(_) => None,
        }
    }
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read and parsed from disk.
    Loaded,
    /// Served from the cache.
    Cached,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "Loaded",
            Self::Cached => "Cached",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type InFlight = Arc<OnceCell<CacheEntry>>;

#[derive(Debug, Default)]
pub struct ImportCache {
    entries: RwLock<FxHashMap<String, CacheEntry>>,
    in_flight: Mutex<FxHashMap<String, InFlight>>,
}

impl ImportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().get(key).cloned()
    }

    /// Insert or replace an entry. The last writer wins.
    pub fn set(&self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.write().insert(key.into(), entry);
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Return the entry for `key`, running `load` on a miss.
    ///
    /// Concurrent callers missing on the same key wait for a single `load`.
    /// Only the caller whose `load` ran sees [`Action::Loaded`]. A failed
    /// `load` caches nothing; waiting callers then retry with their own.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, load: F) -> Result<(CacheEntry, Action), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheEntry, E>>,
    {
        if let Some(entry) = self.get(key) {
            return Ok((entry, Action::Cached));
        }

        // Re-check under the in-flight lock: a load may have settled since.
        let cell = {
            let mut in_flight = self.in_flight.lock();
            if let Some(entry) = self.get(key) {
                return Ok((entry, Action::Cached));
            }
            in_flight.entry(key.to_owned()).or_default().clone()
        };

        let mut loaded = false;
        let result = cell
            .get_or_try_init(|| {
                loaded = true;
                load()
            })
            .await
            .cloned();

        if loaded && let Ok(entry) = &result {
            self.set(key, entry.clone());
        }
        self.settle(key, &cell);

        let action = if loaded { Action::Loaded } else { Action::Cached };
        result.map(|entry| (entry, action))
    }

    /// Drop the in-flight marker for `key` if it is still `cell`.
    fn settle(&self, key: &str, cell: &InFlight) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.get(key).is_some_and(|current| Arc::ptr_eq(current, cell)) {
            in_flight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn json_entry(value: Value) -> CacheEntry {
        CacheEntry::Json(Arc::new(value))
    }

    #[test]
    fn test_get_set_has() {
        let cache = ImportCache::new();
        assert!(cache.is_empty());
        assert!(!cache.has("src/data/imports/menu.json"));
        assert_eq!(cache.get("src/data/imports/menu.json"), None);

        cache.set("src/data/imports/menu.json", json_entry(json!(["home"])));

        assert!(cache.has("src/data/imports/menu.json"));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("src/data/imports/menu.json"),
            Some(json_entry(json!(["home"])))
        );
    }

    #[test]
    fn test_set_last_writer_wins() {
        let cache = ImportCache::new();
        cache.set("k", json_entry(json!(1)));
        cache.set("k", json_entry(json!(2)));
        assert_eq!(cache.get("k"), Some(json_entry(json!(2))));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_sorted() {
        let cache = ImportCache::new();
        cache.set("b", json_entry(json!(null)));
        cache.set("a", json_entry(json!(null)));
        assert_eq!(cache.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_entry_accessors() {
        let json = json_entry(json!({}));
        assert!(json.as_json().is_some());
        assert!(json.as_page().is_none());

        let page = CacheEntry::Page(Arc::new(Pocket::new("about", "data")));
        assert!(page.as_page().is_some());
        assert!(page.as_json().is_none());
    }

    #[tokio::test]
    async fn test_get_or_load_miss_then_hit() {
        let cache = ImportCache::new();

        let (entry, action) = cache
            .get_or_load("k", || async { Ok::<_, ()>(json_entry(json!([1]))) })
            .await
            .unwrap();
        assert_eq!(action, Action::Loaded);
        assert_eq!(entry, json_entry(json!([1])));

        let (entry, action) = cache
            .get_or_load("k", || async { Err::<CacheEntry, ()>(()) })
            .await
            .unwrap();
        assert_eq!(action, Action::Cached);
        assert_eq!(entry, json_entry(json!([1])));
    }

    #[tokio::test]
    async fn test_get_or_load_failure_caches_nothing() {
        let cache = ImportCache::new();

        let result = cache
            .get_or_load("k", || async { Err::<CacheEntry, _>("boom") })
            .await;
        assert_eq!(result.unwrap_err(), "boom");
        assert!(!cache.has("k"));
        assert!(cache.in_flight.lock().is_empty());

        let (_, action) = cache
            .get_or_load("k", || async { Ok::<_, ()>(json_entry(json!(true))) })
            .await
            .unwrap();
        assert_eq!(action, Action::Loaded);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_share_one_load() {
        let cache = Arc::new(ImportCache::new());
        let loads = Arc::new(AtomicUsize::new(0));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            tasks.spawn(async move {
                cache
                    .get_or_load("shared", || async move {
                        loads.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok::<_, ()>(json_entry(json!("value")))
                    })
                    .await
                    .unwrap()
            });
        }

        let mut loaded = 0;
        while let Some(joined) = tasks.join_next().await {
            let (entry, action) = joined.unwrap();
            assert_eq!(entry, json_entry(json!("value")));
            if action == Action::Loaded {
                loaded += 1;
            }
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(loaded, 1);
        assert!(cache.in_flight.lock().is_empty());
    }
}
