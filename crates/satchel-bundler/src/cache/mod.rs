//! In-memory memoization of generated bundles.
//!
//! # Architecture
//!
//! - **Content-addressed**: keys are BLAKE3 hashes of the entry and options
//! - **Bounded**: an optional capacity evicts the least recently used entry
//! - **Expiring**: an optional TTL is checked lazily on read
//! - **Shared**: clones of a [`BundleCache`] see the same entries
//!
//! The cache is generic so that embedders can reuse it for other
//! request/response pairs. The bundler stores serialized
//! [`BundleResult`](crate::BundleResult)s keyed by
//! [`compute_cache_key`].

mod key;

pub use key::{compute_cache_key, content_hash};

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Limits applied to a [`BundleCache`].
///
/// The default is unbounded with no expiry, which matches the behavior of a
/// plain process-lifetime memo table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries. `None` means unbounded.
    pub capacity: Option<usize>,

    /// Lifetime of an entry after insertion. `None` means entries never expire.
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed.
    pub expirations: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, in `0.0..=1.0`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
    /// Logical clock value of the last insert or hit.
    last_accessed: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[derive(Debug)]
struct CacheInner<K, V> {
    entries: FxHashMap<K, CacheEntry<V>>,
    clock: u64,
    stats: CacheStats,
}

impl<K: Eq + Hash, V> CacheInner<K, V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recently_used(&mut self) -> bool
    where
        K: Clone,
    {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        match victim {
            Some(key) => {
                self.entries.remove(&key);
                self.stats.evictions += 1;
                true
            }
            None => false,
        }
    }
}

/// Thread-safe key/value cache with optional capacity and TTL.
///
/// Values are cloned out on read; store cheap-to-clone or `Arc`ed values.
#[derive(Debug)]
pub struct BundleCache<K, V> {
    inner: Arc<Mutex<CacheInner<K, V>>>,
    config: CacheConfig,
}

impl<K, V> Clone for BundleCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for BundleCache<K, V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<K: Eq + Hash + Clone, V: Clone> BundleCache<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                entries: FxHashMap::default(),
                clock: 0,
                stats: CacheStats::default(),
            })),
            config,
        }
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Look up `key`, dropping it first if its TTL has elapsed.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();
        let now = Instant::now();

        if inner.entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            inner.entries.remove(key);
            inner.stats.expirations += 1;
        }

        let tick = inner.tick();
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.last_accessed = tick;
                let value = entry.value.clone();
                inner.stats.hits += 1;
                Some(value)
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Insert using the configured TTL.
    pub fn insert(&self, key: K, value: V) {
        self.insert_entry(key, value, self.config.ttl);
    }

    /// Insert with a TTL that overrides the configured one.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.insert_entry(key, value, Some(ttl));
    }

    fn insert_entry(&self, key: K, value: V, ttl: Option<Duration>) {
        if self.config.capacity == Some(0) {
            return;
        }

        let mut inner = self.inner.lock();
        let now = Instant::now();

        if let Some(capacity) = self.config.capacity {
            if !inner.entries.contains_key(&key) {
                while inner.entries.len() >= capacity {
                    if !inner.evict_least_recently_used() {
                        break;
                    }
                }
            }
        }

        let last_accessed = inner.tick();
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: ttl.map(|ttl| now + ttl),
                last_accessed,
            },
        );
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Number of stored entries, including ones whose TTL elapsed but that
    /// have not been looked up or pruned yet.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry and return how many were removed.
    pub fn prune_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - inner.entries.len();
        inner.stats.expirations += removed as u64;
        removed
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }
}
