//! TTL cache for computed statistics.
//!
//! Backed by `moka` with per-entry expiry, so each `put` decides how long
//! its value lives.

use std::time::{Duration, Instant};

use activity24_core::CacheService;
use moka::sync::Cache;
use moka::Expiry;
use tracing::debug;

const DEFAULT_MAX_ENTRIES: u64 = 1_024;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    ttl: Duration,
}

struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, value: &CacheEntry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Clone)]
pub struct MokaCache {
    cache: Cache<String, CacheEntry>,
}

impl MokaCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryTtl)
                .build(),
        }
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheService for MokaCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let hit = self.cache.get(key).map(|entry| entry.value);
        debug!(key, hit = hit.is_some(), "Cache lookup");
        hit
    }

    fn put(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        debug!(key, ttl_secs = ttl.as_secs(), "Cache put");
        self.cache.insert(key.to_string(), CacheEntry { value, ttl });
    }
}
