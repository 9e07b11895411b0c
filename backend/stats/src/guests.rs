//! Distinct guests (by IP) inside the window.

use std::time::Duration;

use activity24_core::{ActivityError, ActivityStore, CacheService};
use tracing::debug;

use crate::cached;
use crate::window::SECONDS_IN_MINUTE;

pub const GUESTS_CACHE_KEY: &str = "_total_guests_online_24";

/// Session times are stored at minute granularity, so the threshold is
/// floored to the minute.
pub fn minute_floor(threshold: i64) -> i64 {
    threshold - threshold.rem_euclid(SECONDS_IN_MINUTE)
}

/// Guest count for the window; `0` without touching cache or store when
/// guest tracking is off.
pub async fn get_guest_count(
    threshold: i64,
    store: &dyn ActivityStore,
    cache: &dyn CacheService,
    guest_tracking_enabled: bool,
    ttl: Duration,
) -> Result<u64, ActivityError> {
    if !guest_tracking_enabled {
        return Ok(0);
    }

    if let Some(count) = cached::get::<u64>(cache, GUESTS_CACHE_KEY) {
        return Ok(count);
    }

    let since = minute_floor(threshold);
    let count = store
        .distinct_guest_ips_since(since)
        .await
        .map_err(|e| ActivityError::query("guest sessions", format!("{e:#}")))?;
    debug!(since, count, "Counted guests");

    cached::put(cache, GUESTS_CACHE_KEY, &count, ttl);
    Ok(count)
}
