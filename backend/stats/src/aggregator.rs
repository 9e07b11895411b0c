//! New posts, topics and users inside the window.

use std::time::Duration;

use activity24_core::{ActivityCounts, ActivityError, ActivityStore, CacheService};
use activity24_hooks::HookPipeline;
use tracing::debug;

use crate::cached;

pub const ACTIVITY_CACHE_KEY: &str = "_24hour_activity";

/// Cache-or-compute the activity counts for `threshold`.
///
/// On a miss all three counts are queried; if any query fails nothing is
/// cached and the error is returned. Computed counts go through the
/// `Activity` hook before they are cached.
pub async fn get_activity_counts(
    threshold: i64,
    store: &dyn ActivityStore,
    cache: &dyn CacheService,
    hooks: &HookPipeline,
    ttl: Duration,
) -> Result<ActivityCounts, ActivityError> {
    if let Some(counts) = cached::get::<ActivityCounts>(cache, ACTIVITY_CACHE_KEY) {
        return Ok(counts);
    }

    let posts = store
        .count_posts_since(threshold)
        .await
        .map_err(|e| ActivityError::query("new posts", format!("{e:#}")))?;
    let topics = store
        .count_topics_since(threshold)
        .await
        .map_err(|e| ActivityError::query("new topics", format!("{e:#}")))?;
    let new_users = store
        .count_users_registered_since(threshold)
        .await
        .map_err(|e| ActivityError::query("new users", format!("{e:#}")))?;

    let counts = hooks
        .activity(ActivityCounts { posts, topics, new_users })
        .await;
    debug!(threshold, ?counts, "Computed activity counts");

    cached::put(cache, ACTIVITY_CACHE_KEY, &counts, ttl);
    Ok(counts)
}
