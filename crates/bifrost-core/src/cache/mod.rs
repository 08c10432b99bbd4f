//! Short-lived process-wide result cache.
//!
//! A single concurrent map of structured string keys (`gasPrice`,
//! `feeHistory`, `getBalance.<addr>.<tag>`, ...) to JSON values with a
//! per-entry TTL. No LRU, no persistence; expired entries are evicted
//! lazily on lookup.
//!
//! Negative results are cached too: `getBalance`/`getCode` store `0x0`/`0x`
//! for one hour when the backend reports an unknown account or contract.
//! This intentionally absorbs probing clients, and it can mask a real
//! account appearing later within the TTL window.

use ahash::RandomState;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Concurrent TTL cache for translated RPC results.
///
/// Safe for concurrent read/write; lookups and insertions never suspend.
#[derive(Debug, Default)]
pub struct ExpiringCache {
    entries: DashMap<String, CacheEntry, RandomState>,
}

impl ExpiringCache {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: DashMap::with_hasher(RandomState::new()) }
    }

    /// Returns the cached value for `key`, or `None` if absent or expired.
    ///
    /// Expired entries are removed on the way out.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                trace!(key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            trace!(key, "cache entry expired");
        }
        None
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: serde_json::Value, ttl: Duration) {
        let key = key.into();
        trace!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache set");
        self.entries.insert(key, CacheEntry { value, expires_at: Instant::now() + ttl });
    }

    /// Number of entries currently stored, including not-yet-evicted
    /// expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
