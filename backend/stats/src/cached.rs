//! Typed access to the JSON cache.

use std::time::Duration;

use activity24_core::CacheService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Read and decode a cached value. Undecodable entries count as a miss.
pub(crate) fn get<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    let raw = cache.get(key)?;
    match serde_json::from_value(raw) {
        Ok(value) => {
            debug!(key, "Cache hit");
            Some(value)
        }
        Err(e) => {
            warn!(key, error = %e, "Discarding undecodable cache entry");
            None
        }
    }
}

pub(crate) fn put<T: Serialize>(cache: &dyn CacheService, key: &str, value: &T, ttl: Duration) {
    match serde_json::to_value(value) {
        Ok(json) => cache.put(key, json, ttl),
        Err(e) => warn!(key, error = %e, "Value not cacheable"),
    }
}
