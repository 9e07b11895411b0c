//! Presentation payload handed to the host template engine.

use activity24_core::{ActivityCounts, ClassificationTally, LangArg, Localizer, RevealedHidden, Window};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Inputs for the template variables.
pub struct TemplateInputs<'a> {
    pub tally: ClassificationTally,
    /// How the classifier tallied revealed hidden users.
    pub revealed_hidden: RevealedHidden,
    pub activity: ActivityCounts,
    pub hide_bots: bool,
    pub can_view_stats: bool,
    pub tabbed_stat_block: bool,
    pub hour_error: bool,
    pub lookback_string: &'a str,
}

/// Build the flat template variables.
pub fn template_vars(input: &TemplateInputs<'_>, lang: &dyn Localizer) -> Map<String, Value> {
    let t = input.tally;
    let n = |v: u64| [LangArg::from(v)];
    let registered = t.registered_online(input.revealed_hidden);

    let bots_active = if input.hide_bots { json!("") } else { json!(t.bots) };
    let guests_line = if t.guests > 0 {
        lang.lang("GUEST_ONLINE_24", &n(t.guests))
    } else {
        String::new()
    };

    let mut vars = Map::new();
    vars.insert("DISPLAY_LINK".into(), json!(t.any_activity()));
    vars.insert("BOTS_ACTIVE".into(), bots_active);
    vars.insert("USERS_ACTIVE".into(), json!(t.visible_users + t.hidden_users));
    vars.insert(
        "TOTAL_24HOUR_USERS".into(),
        json!(lang.lang("TOTAL_24HOUR_USERS", &n(registered + t.guests + t.bots))),
    );
    vars.insert(
        "USERS_24HOUR_TOTAL".into(),
        json!(lang.lang("USERS_24HOUR_TOTAL", &n(registered.saturating_sub(t.hidden_users)))),
    );
    vars.insert("BOTS_24HOUR_TOTAL".into(), json!(lang.lang("BOTS_24HOUR_TOTAL", &n(t.bots))));
    vars.insert("HIDDEN_24HOUR_TOTAL".into(), json!(lang.lang("HIDDEN_24HOUR_TOTAL", &n(t.hidden_users))));
    vars.insert("GUEST_ONLINE_24".into(), json!(guests_line));
    vars.insert("HOUR_TOPICS".into(), json!(lang.lang("24HOUR_TOPICS", &n(input.activity.topics))));
    vars.insert("HOUR_POSTS".into(), json!(lang.lang("24HOUR_POSTS", &n(input.activity.posts))));
    vars.insert("HOUR_USERS".into(), json!(lang.lang("24HOUR_USERS", &n(input.activity.new_users))));
    vars.insert("S_CAN_VIEW_24_HOURS".into(), json!(input.can_view_stats));
    vars.insert("S_TABBEDSTATBLOCK".into(), json!(input.tabbed_stat_block));
    vars.insert("HOUR_ERROR".into(), json!(input.hour_error));
    vars.insert(
        "L_TWENTYFOURHOUR_STATS".into(),
        json!(format!("{} {}", lang.lang("TWENTYFOURHOUR_STATS", &[]), input.lookback_string)),
    );
    vars
}

/// Everything the page needs to render the activity block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDisplay {
    pub window: Window,
    pub activity: ActivityCounts,
    pub tally: ClassificationTally,
    /// Flat template variables, after the display hook.
    pub vars: Map<String, Value>,
    /// `lastvisit` block rows (`USERNAME_FULL`).
    pub lastvisit: Vec<String>,
    /// `bot_lastvisit` block rows (`BOTNAME_FULL`).
    pub bot_lastvisit: Vec<String>,
}

impl ActivityDisplay {
    pub fn var(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Flat key/value payload, block lists included as arrays of rows.
    pub fn to_flat_map(&self) -> Map<String, Value> {
        let mut map = self.vars.clone();
        let rows = |key: &str, items: &[String]| {
            let rows = items
                .iter()
                .map(|html| {
                    let mut row = Map::new();
                    row.insert(key.to_string(), Value::String(html.clone()));
                    Value::Object(row)
                })
                .collect();
            Value::Array(rows)
        };
        map.insert("lastvisit".into(), rows("USERNAME_FULL", &self.lastvisit));
        map.insert("bot_lastvisit".into(), rows("BOTNAME_FULL", &self.bot_lastvisit));
        map
    }
}
