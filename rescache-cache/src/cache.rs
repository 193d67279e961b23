//! In-memory expiring cache of resources.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, instrument};

use rescache_core::error::Result;
use rescache_core::traits::{Clock, SystemClock};
use rescache_core::types::NormalizedKey;
use rescache_resource::Resource;

use crate::config::CacheConfig;

/// Cache entry. Replaced whole on refresh, never mutated.
struct CacheEntry<T> {
    key: NormalizedKey,
    value: Resource<T>,
    created_at_ms: u64,
}

impl<T> CacheEntry<T> {
    /// Age at `now_ms`. A creation time in the future counts as age zero.
    fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }

    fn is_fresh(&self, now_ms: u64, window_ms: u64) -> bool {
        self.age_ms(now_ms) < window_ms
    }
}

/// Name-keyed, time-expiring cache of [`Resource`]s.
///
/// Keys are lower-cased before lookup and storage. Within the freshness window
/// every lookup for a key returns the same resource; after it, the next lookup
/// invokes the factory again and replaces the entry. Stale entries are never
/// removed unless their key is looked up again.
///
/// Thread-safe; the factory runs while the entry map is locked, so concurrent
/// lookups of one key start at most one computation.
pub struct ResourceCache<T, C = SystemClock> {
    entries: Mutex<HashMap<NormalizedKey, CacheEntry<T>>>,
    config: CacheConfig,
    clock: C,
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
}

impl<T> ResourceCache<T, SystemClock> {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<T, C: Clock> ResourceCache<T, C> {
    /// Creates a cache that measures entry age with `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Returns the resource cached for `raw_key`, creating it with `factory`
    /// when there is none or the cached one is stale.
    ///
    /// Never waits on the computation. `factory` is called at most once, and only
    /// on a miss or stale hit.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidKey`](rescache_core::CacheError::InvalidKey) if
    /// `raw_key` is empty or blank. The factory is not called.
    #[instrument(skip(self, factory), fields(window_ms = self.config.freshness_window_ms))]
    pub fn get_or_create<F>(&self, raw_key: &str, factory: F) -> Result<Resource<T>>
    where
        F: FnOnce() -> Resource<T>,
    {
        let key = NormalizedKey::parse(raw_key)?;
        let window_ms = self.config.freshness_window_ms;

        let mut entries = self.entries.lock();
        let now_ms = self.clock.now_ms();

        match entries.get(key.as_str()) {
            Some(entry) if entry.is_fresh(now_ms, window_ms) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    key = %entry.key,
                    resource = %entry.value.id(),
                    age_ms = entry.age_ms(now_ms),
                    "Cache hit"
                );
                return Ok(entry.value.clone());
            }
            Some(entry) => {
                self.refreshes.fetch_add(1, Ordering::Relaxed);
                debug!(
                    key = %entry.key,
                    stale = %entry.value.id(),
                    age_ms = entry.age_ms(now_ms),
                    "Stale entry, refreshing"
                );
            }
            None => debug!(key = %key, "Cache miss"),
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let resource = factory();
        debug!(key = %key, resource = %resource.id(), "Stored new resource");

        entries.insert(
            key.clone(),
            CacheEntry {
                key,
                value: resource.clone(),
                created_at_ms: now_ms,
            },
        );

        Ok(resource)
    }

    /// Returns true if an entry exists for `raw_key`, fresh or stale.
    pub fn contains(&self, raw_key: &str) -> bool {
        match NormalizedKey::parse(raw_key) {
            Ok(key) => self.entries.lock().contains_key(key.as_str()),
            Err(_) => false,
        }
    }

    /// Returns the number of stored entries, including stale ones.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        let now_ms = self.clock.now_ms();
        let stale = entries
            .values()
            .filter(|e| !e.is_fresh(now_ms, self.config.freshness_window_ms))
            .count();
        CacheStats {
            total_entries: entries.len(),
            fresh_entries: entries.len().saturating_sub(stale),
            stale_entries: stale,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
        }
    }
}

impl<T> Default for ResourceCache<T, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
    /// Lookups served from a fresh entry
    pub hits: u64,
    /// Lookups that invoked the factory (includes refreshes)
    pub misses: u64,
    /// Misses that replaced a stale entry
    pub refreshes: u64,
}
