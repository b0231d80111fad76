//! TTL-based cache for generated SQL.
//!
//! Memoizes the translator's output keyed by the verbatim question text.
//! Entries expire solely by TTL -- there is no invalidation path. Concurrent
//! writers for the same key race benignly (last-writer-wins): both computed
//! the same semantic value, modulo model non-determinism.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A cached value with timestamp for TTL checking.
#[derive(Debug, Clone)]
struct CachedValue<T> {
    value: T,
    cached_at: Instant,
    ttl: Duration,
}

impl<T: Clone> CachedValue<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            ttl,
        }
    }

    fn is_valid(&self) -> bool {
        self.cached_at.elapsed() < self.ttl
    }

    fn get(&self) -> Option<T> {
        if self.is_valid() {
            Some(self.value.clone())
        } else {
            None
        }
    }
}

/// Thread-safe key-value store for generated SQL with per-entry TTL.
pub struct SqlCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedValue<String>>>,
}

impl SqlCache {
    /// Create a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an unexpired entry.
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read();
        entries.get(key).and_then(|c| c.get())
    }

    /// Insert or overwrite an entry with the configured TTL.
    ///
    /// Expired entries are swept on the same write lock so the map does not
    /// accumulate dead keys between hits.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.write();
        entries.retain(|_, v| v.is_valid());
        entries.insert(key.into(), CachedValue::new(value.into(), self.ttl));
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
