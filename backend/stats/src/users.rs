//! Users seen inside the window, joined with their latest session.

use std::collections::HashMap;
use std::time::Duration;

use activity24_core::{
    ActivityError, ActivityStore, CacheService, JoinClause, SelectQuery, UserSession,
    ANONYMOUS_USER_ID,
};
use activity24_hooks::HookPipeline;
use tracing::debug;

use crate::cached;

pub const ACTIVE_USERS_CACHE_KEY: &str = "_24hour_users";

/// Users who visited after `threshold` or hold a non-guest session.
pub fn active_user_query(table_prefix: &str, threshold: i64) -> SelectQuery {
    SelectQuery {
        select: "u.user_id, u.user_colour, u.username, u.user_type, u.user_lastvisit, \
                 u.user_allow_viewonline, MAX(s.session_time) AS session_time, s.session_viewonline"
            .to_string(),
        from: vec![(format!("{table_prefix}users"), "u".to_string())],
        left_join: vec![JoinClause {
            table: format!("{table_prefix}sessions"),
            alias: "s".to_string(),
            on: "s.session_user_id = u.user_id".to_string(),
        }],
        where_clause: Some(format!(
            "u.user_lastvisit > {threshold} OR s.session_user_id <> {ANONYMOUS_USER_ID}"
        )),
        group_by: Some("u.user_id, s.session_viewonline".to_string()),
        order_by: Some("u.username_clean".to_string()),
    }
}

/// Keep one row per user. A later row replaces the earlier one but keeps
/// its position.
pub fn dedupe_by_user(rows: Vec<UserSession>) -> Vec<UserSession> {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(rows.len());
    let mut out: Vec<UserSession> = Vec::with_capacity(rows.len());
    for row in rows {
        match index.get(&row.user_id) {
            Some(&i) => out[i] = row,
            None => {
                index.insert(row.user_id, out.len());
                out.push(row);
            }
        }
    }
    out
}

/// Cache-or-load the active user rows, then pass them through the
/// `ActiveUsers` hook (on cache hits too).
pub async fn obtain_active_users(
    threshold: i64,
    table_prefix: &str,
    store: &dyn ActivityStore,
    cache: &dyn CacheService,
    hooks: &HookPipeline,
    ttl: Duration,
) -> Result<Vec<UserSession>, ActivityError> {
    let users = match cached::get::<Vec<UserSession>>(cache, ACTIVE_USERS_CACHE_KEY) {
        Some(users) => users,
        None => {
            let query = hooks.sql_query(active_user_query(table_prefix, threshold)).await;
            let rows = store
                .active_users(&query)
                .await
                .map_err(|e| ActivityError::query(query.build(), format!("{e:#}")))?;
            let users = dedupe_by_user(rows);
            debug!(threshold, users = users.len(), "Loaded active users");
            cached::put(cache, ACTIVE_USERS_CACHE_KEY, &users, ttl);
            users
        }
    };

    Ok(hooks.active_users(users).await)
}
