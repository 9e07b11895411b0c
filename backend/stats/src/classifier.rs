//! Sorts active users into visible, hidden and bot buckets and renders the
//! lists a viewer is allowed to see.

use activity24_core::{
    ClassificationTally, DateFormatter, DateMode, RevealedHidden, UserSession, UserType,
    ViewerContext,
};
use serde::{Deserialize, Serialize};

use crate::render::{username_string, with_hover, ProfileLinks, UsernameMode};

/// Everything about the request that affects classification.
pub struct ClassifyContext<'a> {
    pub threshold: i64,
    /// Bots are dropped entirely (sibling extension installed, viewer not admin).
    pub hide_bots: bool,
    pub viewer: ViewerContext,
    pub date_mode: DateMode,
    pub revealed_hidden: RevealedHidden,
    pub dates: &'a dyn DateFormatter,
    pub links: &'a ProfileLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub tally: ClassificationTally,
    /// Rendered users, in input order.
    pub visible: Vec<String>,
    /// Rendered bots, in input order.
    pub bots: Vec<String>,
}

fn is_stale(row: &UserSession, threshold: i64) -> bool {
    row.last_visit < threshold && row.session_time.unwrap_or(0) < threshold
}

/// Opted out of online status, either for the live session or for the account.
fn is_hidden(row: &UserSession) -> bool {
    let session_hidden = row.session_view_online == Some(false) && row.session_time.unwrap_or(0) != 0;
    (session_hidden || !row.allow_view_online) && !row.user_type.is_bot()
}

/// Classify `sessions` in one pass. Pure: the same input always yields the
/// same tally and lists.
pub fn classify(sessions: &[UserSession], ctx: &ClassifyContext<'_>) -> Classification {
    let mut out = Classification::default();

    for row in sessions {
        if row.user_type == UserType::Anonymous {
            continue;
        }
        if (ctx.hide_bots && row.user_type.is_bot()) || is_stale(row, ctx.threshold) {
            continue;
        }

        let hover = ctx.dates.format_date(row.effective_last_active(), ctx.date_mode);

        if is_hidden(row) {
            out.tally.hidden_users += 1;
            let revealed = ctx.viewer.can_view_online || row.user_id == ctx.viewer.user_id;
            if !revealed {
                // Counted, never shown.
                out.tally.visible_users += 1;
                continue;
            }
            out.tally.revealed_hidden += 1;
            if ctx.revealed_hidden == RevealedHidden::CountAsVisible {
                out.tally.visible_users += 1;
            }
            let name = username_string(UsernameMode::Full, row, true, ctx.links);
            out.visible.push(with_hover(&hover, &name));
            continue;
        }

        if row.user_type.is_bot() {
            out.tally.bots += 1;
            let name = username_string(UsernameMode::NoProfile, row, false, ctx.links);
            out.bots.push(with_hover(&hover, &name));
            continue;
        }

        out.tally.visible_users += 1;
        let mode = if ctx.viewer.can_view_profile {
            UsernameMode::Full
        } else {
            UsernameMode::NoProfile
        };
        let name = username_string(mode, row, false, ctx.links);
        out.visible.push(with_hover(&hover, &name));
    }

    out
}
