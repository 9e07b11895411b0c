use std::fmt;

use serde::{Deserialize, Serialize};

/// User id of the anonymous placeholder account that owns every guest session.
pub const ANONYMOUS_USER_ID: i64 = 1;

/// Store code for "ignored" accounts, which is how crawlers are registered.
pub const USER_TYPE_IGNORE: i64 = 2;

/// The trailing interval that activity is counted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub now: i64,
    pub lookback_seconds: i64,
    /// Always `now - lookback_seconds`.
    pub threshold: i64,
}

/// Entities created after the window threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub posts: u64,
    pub topics: u64,
    pub new_users: u64,
}

/// Account classification as far as the activity block cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Normal,
    Bot,
    Anonymous,
}

impl UserType {
    /// Map a stored `user_type` code plus user id onto the classification.
    pub fn from_row(user_id: i64, code: i64) -> Self {
        if user_id == ANONYMOUS_USER_ID {
            Self::Anonymous
        } else if code == USER_TYPE_IGNORE {
            Self::Bot
        } else {
            Self::Normal
        }
    }

    pub fn is_bot(self) -> bool {
        self == Self::Bot
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Bot => write!(f, "bot"),
            Self::Anonymous => write!(f, "anonymous"),
        }
    }
}

/// One user joined with their latest session, as read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: i64,
    pub username: String,
    /// Hex colour without the leading `#`; empty when the user has none.
    #[serde(default)]
    pub user_colour: String,
    pub user_type: UserType,
    pub last_visit: i64,
    /// `None` when the user has no live session row.
    #[serde(default)]
    pub session_time: Option<i64>,
    #[serde(default)]
    pub session_view_online: Option<bool>,
    pub allow_view_online: bool,
}

impl UserSession {
    /// Most recent sign of life: last visit or live session, whichever is later.
    pub fn effective_last_active(&self) -> i64 {
        self.last_visit.max(self.session_time.unwrap_or(0))
    }
}

/// Counts produced by the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTally {
    pub visible_users: u64,
    pub hidden_users: u64,
    pub bots: u64,
    pub guests: u64,
    /// Hidden users rendered to this viewer. A subset of `hidden_users`.
    #[serde(default)]
    pub revealed_hidden: u64,
}

impl ClassificationTally {
    pub fn any_activity(&self) -> bool {
        self.visible_users > 0 || self.hidden_users > 0 || self.bots > 0
    }

    /// Registered users online, hidden ones included, whatever the policy.
    ///
    /// Under `HiddenOnly` revealed hidden users are missing from
    /// `visible_users` and are added back here.
    pub fn registered_online(&self, policy: RevealedHidden) -> u64 {
        match policy {
            RevealedHidden::CountAsVisible => self.visible_users,
            RevealedHidden::HiddenOnly => self.visible_users + self.revealed_hidden,
        }
    }
}

/// Permissions of the user the page is being rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerContext {
    pub user_id: i64,
    pub can_view_stats: bool,
    pub is_admin: bool,
    pub can_view_online: bool,
    pub can_view_profile: bool,
}

/// Marker for the sibling extension that hides bots from non-admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideBots;

/// Marker for the sibling extension that renders dates relatively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDates;

/// Optional sibling extensions the host has installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub hide_bots: Option<HideBots>,
    pub relative_dates: Option<RelativeDates>,
    pub tabbed_stat_block: bool,
}

/// How a hidden user revealed to a privileged viewer is tallied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealedHidden {
    /// Counted as hidden and as visible, like any other rendered user.
    #[default]
    CountAsVisible,
    /// Counted as hidden only.
    HiddenOnly,
}
