/// Built-in hook implementations.
///
/// Bundled filters a host can register without writing its own `Hook`.
use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::registry::Hook;
use crate::types::{HookPayload, HookResult};

// ---------------------------------------------------------------------------
// Logging hook: logs every payload it sees
// ---------------------------------------------------------------------------

pub struct LoggingHook {
    pub prefix: String,
}

impl LoggingHook {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

#[async_trait]
impl Hook for LoggingHook {
    fn name(&self) -> &str {
        "logging_hook"
    }

    async fn run(&self, payload: &HookPayload) -> Result<HookResult> {
        info!("[{}] Hook fired: {:?}", self.prefix, payload.phase());
        Ok(HookResult::pass())
    }
}

// ---------------------------------------------------------------------------
// Lookback override: replaces the interval with a fixed value
// ---------------------------------------------------------------------------

pub struct LookBackOverrideHook {
    pub seconds: i64,
}

impl LookBackOverrideHook {
    pub fn new(seconds: i64) -> Self {
        Self { seconds }
    }
}

#[async_trait]
impl Hook for LookBackOverrideHook {
    fn name(&self) -> &str {
        "look_back_override_hook"
    }

    async fn run(&self, payload: &HookPayload) -> Result<HookResult> {
        match payload {
            HookPayload::LookBack(current) if *current != self.seconds => {
                info!("[LookBack] {}s → {}s", current, self.seconds);
                Ok(HookResult::transform(HookPayload::LookBack(self.seconds)))
            }
            _ => Ok(HookResult::pass()),
        }
    }
}

// ---------------------------------------------------------------------------
// Exclude users: drops listed accounts from the active user rows
// ---------------------------------------------------------------------------

pub struct ExcludeUsersHook {
    pub user_ids: HashSet<i64>,
}

impl ExcludeUsersHook {
    pub fn new(user_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            user_ids: user_ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Hook for ExcludeUsersHook {
    fn name(&self) -> &str {
        "exclude_users_hook"
    }

    async fn run(&self, payload: &HookPayload) -> Result<HookResult> {
        let HookPayload::ActiveUsers(users) = payload else {
            return Ok(HookResult::pass());
        };
        if !users.iter().any(|u| self.user_ids.contains(&u.user_id)) {
            return Ok(HookResult::pass());
        }
        let kept = users
            .iter()
            .filter(|u| !self.user_ids.contains(&u.user_id))
            .cloned()
            .collect();
        Ok(HookResult::transform(HookPayload::ActiveUsers(kept)))
    }
}

// ---------------------------------------------------------------------------
// Extra condition: narrows the active user query
// ---------------------------------------------------------------------------

pub struct SqlConditionHook {
    /// Appended to the WHERE clause with `AND`.
    pub condition: String,
}

impl SqlConditionHook {
    pub fn new(condition: impl Into<String>) -> Self {
        Self { condition: condition.into() }
    }
}

#[async_trait]
impl Hook for SqlConditionHook {
    fn name(&self) -> &str {
        "sql_condition_hook"
    }

    async fn run(&self, payload: &HookPayload) -> Result<HookResult> {
        let HookPayload::SqlQuery(query) = payload else {
            return Ok(HookResult::pass());
        };
        let mut query = query.clone();
        query.where_clause = Some(match query.where_clause.take() {
            Some(existing) => format!("({existing}) AND ({})", self.condition),
            None => self.condition.clone(),
        });
        Ok(HookResult::transform(HookPayload::SqlQuery(query)))
    }
}
