/// Hook pipeline executor.
///
/// The pipeline is the typed surface the activity computation calls:
/// 1. Lookback resolved → `pipeline.look_back(...)`
/// 2. Active user query built → `pipeline.sql_query(...)`
/// 3. Active users loaded → `pipeline.active_users(...)`
/// 4. Counts computed → `pipeline.activity(...)`
/// 5. Payload assembled → `pipeline.display(...)`
use activity24_core::{ActivityCounts, SelectQuery, UserSession};
use tracing::debug;

use crate::registry::HookRegistry;
use crate::types::{DisplayPayload, HookPayload};

/// Top-level pipeline that wraps the registry with convenient method APIs.
#[derive(Clone, Default)]
pub struct HookPipeline {
    pub registry: HookRegistry,
}

impl HookPipeline {
    pub fn new(registry: HookRegistry) -> Self {
        Self { registry }
    }

    pub async fn look_back(&self, seconds: i64) -> i64 {
        debug!("[Pipeline] look_back seconds={}", seconds);
        match self.registry.run(HookPayload::LookBack(seconds)).await {
            HookPayload::LookBack(v) => v,
            _ => seconds,
        }
    }

    pub async fn sql_query(&self, query: SelectQuery) -> SelectQuery {
        debug!("[Pipeline] sql_query");
        match self.registry.run(HookPayload::SqlQuery(query.clone())).await {
            HookPayload::SqlQuery(q) => q,
            _ => query,
        }
    }

    pub async fn active_users(&self, users: Vec<UserSession>) -> Vec<UserSession> {
        debug!("[Pipeline] active_users rows={}", users.len());
        match self.registry.run(HookPayload::ActiveUsers(users)).await {
            HookPayload::ActiveUsers(u) => u,
            _ => Vec::new(),
        }
    }

    pub async fn activity(&self, counts: ActivityCounts) -> ActivityCounts {
        debug!(
            "[Pipeline] activity posts={} topics={} users={}",
            counts.posts, counts.topics, counts.new_users
        );
        match self.registry.run(HookPayload::Activity(counts)).await {
            HookPayload::Activity(c) => c,
            _ => counts,
        }
    }

    pub async fn display(&self, payload: DisplayPayload) -> DisplayPayload {
        debug!("[Pipeline] display keys={}", payload.template_data.len());
        match self.registry.run(HookPayload::Display(payload)).await {
            HookPayload::Display(p) => p,
            _ => DisplayPayload::default(),
        }
    }
}
