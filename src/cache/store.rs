//! Cache Store Module
//!
//! Main cache engine combining the entry table, expiration index and recency
//! list behind one lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::cache::expiry::deadline_after;
use crate::cache::{CacheStats, Clock, ExpirationIndex, RecencyList, SystemClock};
use crate::config::{CacheConfig, MAX_TTL};

// == Inner State ==
/// The three co-dependent structures plus counters. Only ever touched while
/// the store's mutex is held.
#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Value>,
    expirations: ExpirationIndex,
    recency: RecencyList,
    stats: CacheStats,
}

impl Inner {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            expirations: ExpirationIndex::with_capacity(capacity),
            recency: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Drops `key` from all three structures.
    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.expirations.remove(key);
        self.recency.remove(key);
        removed
    }
}

// == Cache Store ==
/// Thread-safe key-value store with TTL expiry and LRU capacity eviction.
///
/// Every operation takes the same exclusive lock for its whole body, so each
/// call appears atomic to every other caller. Share it as `Arc<CacheStore>`.
#[derive(Debug)]
pub struct CacheStore {
    inner: Mutex<Inner>,
    max_capacity: usize,
    ttl: Duration,
    refresh_ttl_on_get: bool,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store that reads time from the system monotonic clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit time source.
    ///
    /// A capacity of zero is raised to one and the TTL is capped at [`MAX_TTL`].
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let max_capacity = config.max_capacity.max(1);
        Self {
            inner: Mutex::new(Inner::with_capacity(max_capacity)),
            max_capacity,
            ttl: config.ttl.min(MAX_TTL),
            refresh_ttl_on_get: config.refresh_ttl_on_get,
            clock,
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`, resetting its deadline to `now + ttl` and
    /// making it the most recently used key.
    ///
    /// If the store grows past capacity, least recently used entries are
    /// dropped until it fits again. The key just written is never the victim.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let deadline = deadline_after(self.clock.now(), self.ttl);

        inner.expirations.insert(&key, deadline);
        inner.recency.touch(&key);
        inner.entries.insert(key, value.into());

        while inner.entries.len() > self.max_capacity {
            let Some(victim) = inner.recency.pop_lru() else {
                break;
            };
            inner.entries.remove(&victim);
            inner.expirations.remove(&victim);
            inner.stats.record_eviction();
            debug!(key = %victim, "evicted least recently used entry");
        }
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An expired entry is removed on sight and reported exactly like a key
    /// that was never set. A hit moves the key to the front of the recency
    /// list and, when configured, pushes its deadline out by a full TTL.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = self.clock.now();

        if !inner.entries.contains_key(key) {
            inner.stats.record_miss();
            return None;
        }

        if inner.expirations.is_expired(key, now) {
            inner.remove(key);
            inner.stats.record_miss();
            inner.stats.record_expirations(1);
            debug!(key, "dropped expired entry on lookup");
            return None;
        }

        inner.recency.touch(key);
        if self.refresh_ttl_on_get {
            inner.expirations.insert(key, deadline_after(now, self.ttl));
        }
        inner.stats.record_hit();
        inner.entries.get(key).cloned()
    }

    // == Delete ==
    /// Removes `key` if present. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        if self.inner.lock().remove(key) {
            debug!(key, "deleted entry");
        }
    }

    // == Sweep Expired ==
    /// Removes every entry whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = self.clock.now();

        let expired = inner.expirations.expired_keys(now);
        for key in &expired {
            inner.remove(key);
        }

        inner.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Introspection ==
    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a snapshot of the store counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        stats
    }

    /// Keys from most to least recently used.
    pub fn recency_order(&self) -> Vec<String> {
        self.inner
            .lock()
            .recency
            .iter()
            .map(str::to_string)
            .collect()
    }

    // == Invariants ==
    /// Verifies that the entry table, expiration index and recency list hold
    /// exactly the same keys, that the store is within capacity, and that the
    /// recency links are intact.
    pub fn check_invariants(&self) -> Result<(), String> {
        let inner = self.inner.lock();
        let size = inner.entries.len();

        if size > self.max_capacity {
            return Err(format!("{size} entries exceed capacity {}", self.max_capacity));
        }
        if inner.expirations.len() != size || inner.recency.len() != size {
            return Err(format!(
                "size mismatch: {size} entries, {} deadlines, {} recency keys",
                inner.expirations.len(),
                inner.recency.len()
            ));
        }
        if let Some(key) = inner.expirations.keys().find(|k| !inner.entries.contains_key(*k)) {
            return Err(format!("deadline without entry for '{key}'"));
        }
        if let Some(key) = inner.recency.iter().find(|k| !inner.entries.contains_key(*k)) {
            return Err(format!("recency key without entry for '{key}'"));
        }
        inner.recency.check_links()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    fn config(max_capacity: usize, ttl_secs: u64) -> CacheConfig {
        CacheConfig {
            max_capacity,
            ttl: Duration::from_secs(ttl_secs),
            refresh_ttl_on_get: false,
        }
    }

    fn store_with_clock(max_capacity: usize, ttl_secs: u64) -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let store = CacheStore::with_clock(config(max_capacity, ttl_secs), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(config(100, 300));
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let store = CacheStore::new(config(0, 300));
        store.set("a", 1);
        store.set("b", 2);

        assert_eq!(store.capacity(), 1);
        assert_eq!(store.get("b"), Some(json!(2)));
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_huge_ttl_never_panics() {
        let clock = Arc::new(ManualClock::new());
        let store = CacheStore::with_clock(
            CacheConfig {
                ttl: Duration::MAX,
                refresh_ttl_on_get: true,
                ..config(10, 0)
            },
            clock.clone(),
        );

        assert_eq!(store.ttl(), MAX_TTL);

        store.set("k", 1);
        assert_eq!(store.get("k"), Some(json!(1)));
        clock.advance(Duration::from_secs(365 * 24 * 3600));
        assert_eq!(store.get("k"), Some(json!(1)));
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_store_from_unbounded_env_ttl() {
        let config = crate::config::Config {
            entry_ttl: u64::MAX,
            ..Default::default()
        };
        let store = CacheStore::new(config.cache_config());

        store.set("k", 1);
        assert_eq!(store.get("k"), Some(json!(1)));
    }

    #[test]
    fn test_store_set_and_get_document() {
        let store = CacheStore::new(config(100, 300));
        let doc = json!({"name": "widget", "tags": ["a", "b"], "count": 3});

        store.set("key1", doc.clone());

        assert_eq!(store.get("key1"), Some(doc));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = CacheStore::new(config(100, 300));
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let store = CacheStore::new(config(100, 300));

        store.set("key1", "value1");
        store.delete("key1");
        assert_eq!(store.get("key1"), None);

        store.delete("key1");
        assert_eq!(store.get("key1"), None);
        assert!(store.is_empty());
        assert!(store.check_invariants().is_ok());
    }

    #[test]
    fn test_store_overwrite() {
        let store = CacheStore::new(config(100, 300));

        store.set("key1", "value1");
        store.set("key1", "value2");

        assert_eq!(store.get("key1"), Some(json!("value2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ttl_boundary() {
        let (store, clock) = store_with_clock(10, 5);

        store.set("k", "v");
        clock.advance(Duration::from_millis(4999));
        assert_eq!(store.get("k"), Some(json!("v")));

        clock.advance(Duration::from_millis(1));
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty(), "lookup should drop the expired entry");
        assert!(store.check_invariants().is_ok());
    }

    #[test]
    fn test_overwrite_resets_ttl() {
        let (store, clock) = store_with_clock(10, 5);

        store.set("k", "v1");
        clock.advance(Duration::from_secs(3));
        store.set("k", "v2");
        clock.advance(Duration::from_secs(3));

        assert_eq!(store.get("k"), Some(json!("v2")));
    }

    #[test]
    fn test_overwrite_resets_recency() {
        let store = CacheStore::new(config(2, 300));

        store.set("a", 1);
        store.set("b", 2);
        store.set("a", 10);
        store.set("c", 3);

        assert_eq!(store.get("b"), None);
        assert_eq!(store.get("a"), Some(json!(10)));
        assert_eq!(store.get("c"), Some(json!(3)));
    }

    #[test]
    fn test_get_does_not_extend_ttl_by_default() {
        let (store, clock) = store_with_clock(10, 5);

        store.set("k", "v");
        clock.advance(Duration::from_secs(4));
        assert!(store.get("k").is_some());
        clock.advance(Duration::from_secs(1));

        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_get_extends_ttl_when_configured() {
        let clock = Arc::new(ManualClock::new());
        let store = CacheStore::with_clock(
            CacheConfig {
                refresh_ttl_on_get: true,
                ..config(10, 5)
            },
            clock.clone(),
        );

        store.set("k", "v");
        clock.advance(Duration::from_secs(4));
        assert!(store.get("k").is_some());
        clock.advance(Duration::from_secs(4));

        assert_eq!(store.get("k"), Some(json!("v")));
    }

    #[test]
    fn test_lru_eviction() {
        let store = CacheStore::new(config(3, 300));

        store.set("key1", 1);
        store.set("key2", 2);
        store.set("key3", 3);
        store.set("key4", 4);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_lru_touch_on_get() {
        let store = CacheStore::new(config(2, 300));

        store.set("a", 1);
        store.set("b", 2);
        store.get("a");
        store.set("c", 3);

        assert_eq!(store.get("b"), None);
        assert_eq!(store.get("a"), Some(json!(1)));
        assert_eq!(store.get("c"), Some(json!(3)));
    }

    #[test]
    fn test_recency_order() {
        let store = CacheStore::new(config(10, 300));

        store.set("a", 1);
        store.set("b", 2);
        store.set("c", 3);
        store.get("a");

        assert_eq!(store.recency_order(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_expired_entry_is_indistinguishable_from_missing() {
        let (store, clock) = store_with_clock(10, 1);

        store.set("gone", "v");
        clock.advance(Duration::from_secs(2));

        assert_eq!(store.get("gone"), store.get("never"));
    }

    #[test]
    fn test_mixed_lifetime_scenario() {
        // capacity 2, ttl 5s
        let (store, clock) = store_with_clock(2, 5);
        let tick = || clock.advance(Duration::from_secs(1));

        store.set("a", 1); // t=0
        tick();
        store.set("b", 2); // t=1
        tick();
        assert_eq!(store.get("a"), Some(json!(1))); // t=2
        tick();
        store.set("c", 3); // t=3, evicts b
        tick();
        assert_eq!(store.get("b"), None); // t=4
        tick();
        tick();
        assert_eq!(store.get("a"), None); // t=6, a expired at t=5
        assert_eq!(store.get("c"), Some(json!(3)));
    }

    #[test]
    fn test_sweep_expired() {
        let (store, clock) = store_with_clock(100, 5);

        store.set("key1", 1);
        clock.advance(Duration::from_secs(3));
        store.set("key2", 2);
        clock.advance(Duration::from_secs(2));

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key2"), Some(json!(2)));
        assert_eq!(store.sweep_expired(), 0);
        assert!(store.check_invariants().is_ok());
    }

    #[test]
    fn test_sweep_on_empty_store() {
        let store = CacheStore::new(config(10, 5));
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_stats() {
        let (store, clock) = store_with_clock(1, 5);

        store.set("key1", 1);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss
        store.set("key2", 2); // evicts key1
        clock.advance(Duration::from_secs(5));
        store.get("key2"); // miss + expiration

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 0);
    }
}
