//! TTL view cache for catalog reads.
//!
//! A time-bounded, explicitly-invalidated cache in front of the backing
//! store. Entries expire lazily: an expired entry behaves exactly like an
//! absent one and is reclaimed on the next write-path touch or an explicit
//! purge. There is no background eviction task.
//!
//! # Design Philosophy
//!
//! The cache is an optimization, never a source of truth. Its operations
//! cannot fail: a poisoned lock is recovered rather than propagated, because
//! the map underneath stays valid when some other thread panicked while
//! holding the guard. Correctness is carried by TTLs plus the mutation
//! invalidation hook in the catalog layer, not by the cache itself.
//!
//! # Example
//!
//! ```ignore
//! let cache: CatalogCache = TtlCache::new();
//! cache.set(CacheKey::AllSpots, CacheValue::Spots(spots), Duration::from_secs(300));
//!
//! if let Some(CacheValue::Spots(spots)) = cache.get(&CacheKey::AllSpots) {
//!     // served from cache
//! }
//!
//! // A mutation drops every derived view before it is acknowledged.
//! cache.delete_where(|key| CacheFamily::MUTATION_SCOPED.contains(&key.family()));
//! ```

pub mod key;

pub use key::{CacheFamily, CacheKey, CacheValue, CatalogCache};

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// A cached value with its insertion time and lifetime.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// An entry is visible only while `now < inserted_at + ttl`.
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= self.ttl
    }
}

/// Statistics about cache usage. Counters are advisory, not authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (absent or expired).
    pub misses: u64,
    /// Number of live entries currently in the cache.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Generic TTL key-value cache over a single logical namespace.
///
/// Thread-safe behind one `RwLock`; reads take the shared lock and never
/// remove entries, so concurrent `get`s do not contend on expiry cleanup.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Eq + Hash + Clone, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the value for `key` if present and unexpired.
    /// An expired entry is a miss; it stays in the map until a write path
    /// or purge reclaims it.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let entries = self.read_entries();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite the value for `key`. Overwriting resets the
    /// expiration clock.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            ttl,
        };
        self.write_entries().insert(key, entry);
    }

    /// Remove a single key. Idempotent; returns true when an entry
    /// (live or expired) was removed.
    pub fn delete(&self, key: &K) -> bool {
        self.write_entries().remove(key).is_some()
    }

    /// Remove every entry whose key satisfies `predicate`; returns how many
    /// were removed. This is the coarse-invalidation primitive: callers
    /// match on typed key families rather than parsing keys.
    pub fn delete_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|key, _| !predicate(key));
        before - entries.len()
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.write_entries().clear();
    }

    /// Live (unexpired) keys.
    pub fn keys(&self) -> Vec<K> {
        let now = Instant::now();
        self.read_entries()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.read_entries()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// True when no live entry exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Eagerly drop expired entries; returns how many were reclaimed.
    /// Optional: correctness never depends on calling this.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Snapshot of hit/miss counters and the live entry count.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.len() as u64,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
