use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::query::SelectQuery;
use crate::types::UserSession;

/// Host permission lookups for the current viewer.
pub trait Authorizer: Send + Sync {
    /// True when the viewer holds the permission `key` (e.g. `u_viewonline`).
    fn acl_get(&self, key: &str) -> bool;
}

/// Shared key/value cache with per-entry expiry.
///
/// Values are JSON so any host cache backend can hold them.
pub trait CacheService: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    fn put(&self, key: &str, value: serde_json::Value, ttl: Duration);
}

/// Read-only aggregate queries over the forum tables.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Posts with `post_time > threshold`.
    async fn count_posts_since(&self, threshold: i64) -> Result<u64>;

    /// Topics with `topic_time > threshold`.
    async fn count_topics_since(&self, threshold: i64) -> Result<u64>;

    /// Users with `user_regdate > threshold`, inactive accounts included.
    async fn count_users_registered_since(&self, threshold: i64) -> Result<u64>;

    /// Run the (possibly hook-modified) active user query.
    async fn active_users(&self, query: &SelectQuery) -> Result<Vec<UserSession>>;

    /// Distinct guest IPs with `session_time >= since`.
    async fn distinct_guest_ips_since(&self, since: i64) -> Result<u64>;
}

/// Argument substituted into a localized string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LangArg {
    Int(i64),
    Str(String),
}

impl From<i64> for LangArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for LangArg {
    fn from(v: u64) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for LangArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for LangArg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Host localization lookups.
pub trait Localizer: Send + Sync {
    /// Resolve `key`; the first integer argument selects the plural form.
    fn lang(&self, key: &str, args: &[LangArg]) -> String;
}

/// How a timestamp should be rendered in hover titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    /// Full date and time in the viewer's format.
    Absolute,
    /// "5 minutes ago" style, without an absolute time suffix.
    Relative,
}

/// Viewer-specific date formatting.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, timestamp: i64, mode: DateMode) -> String;
}
