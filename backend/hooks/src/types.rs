/// Filter hook phases and payloads.
///
/// Each phase carries one intermediate value of the activity computation.
/// A hook observes it and may hand back a replacement.
use activity24_core::{ActivityCounts, SelectQuery, UserSession};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Hook phases
// ---------------------------------------------------------------------------

/// The point in the computation at which a hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Lookback interval in seconds, before the window is computed.
    LookBack,
    /// Active user query shape, before it is built and executed.
    SqlQuery,
    /// Active user rows, after cache-or-load.
    ActiveUsers,
    /// Post/topic/new-user counts, before they are cached.
    Activity,
    /// Final presentation payload, before it reaches the template.
    Display,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload passed to display hooks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub activity: ActivityCounts,
    pub active_users: Vec<UserSession>,
    pub guests: u64,
    /// Flat template variables, keyed by their template names.
    pub template_data: serde_json::Map<String, serde_json::Value>,
}

/// Union payload type passed to all hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data", rename_all = "snake_case")]
pub enum HookPayload {
    LookBack(i64),
    SqlQuery(SelectQuery),
    ActiveUsers(Vec<UserSession>),
    Activity(ActivityCounts),
    Display(DisplayPayload),
}

impl HookPayload {
    pub fn phase(&self) -> HookPhase {
        match self {
            Self::LookBack(_) => HookPhase::LookBack,
            Self::SqlQuery(_) => HookPhase::SqlQuery,
            Self::ActiveUsers(_) => HookPhase::ActiveUsers,
            Self::Activity(_) => HookPhase::Activity,
            Self::Display(_) => HookPhase::Display,
        }
    }
}

// ---------------------------------------------------------------------------
// Hook result
// ---------------------------------------------------------------------------

/// Result returned by a hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookResult {
    /// If set, replaces the payload for the remaining hooks and the caller.
    pub modified: Option<HookPayload>,
}

impl HookResult {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn transform(payload: HookPayload) -> Self {
        Self { modified: Some(payload) }
    }
}
