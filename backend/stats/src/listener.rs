//! Entry points the host calls: permission registration, page render and
//! the admin details panel.

use std::sync::Arc;
use std::time::Duration;

use activity24_config::Activity24Config;
use activity24_core::{
    ActivityError, ActivityStore, Authorizer, CacheService, Capabilities, DateFormatter, DateMode,
    Localizer, PermissionCatalog, RevealedHidden, ViewerContext, PERM_VIEW_STATS,
};
use activity24_hooks::{DisplayPayload, HookPipeline};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregator::get_activity_counts;
use crate::classifier::{classify, ClassifyContext};
use crate::display::{template_vars, ActivityDisplay, TemplateInputs};
use crate::guests::get_guest_count;
use crate::render::ProfileLinks;
use crate::users::obtain_active_users;
use crate::window::{compute_window, lookback_string, needs_warning};

/// Name the host uses for this extension in its admin panel.
pub const EXTENSION_NAME: &str = "activity24/activity24hours";

/// Language key of the view permission.
pub const PERM_VIEW_STATS_LANG: &str = "ACL_U_A24HRS_VIEW";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSettings {
    pub lookback_seconds: i64,
    pub cache_ttl: Duration,
    pub load_online_guests: bool,
    pub table_prefix: String,
    pub revealed_hidden: RevealedHidden,
    pub capabilities: Capabilities,
    pub links: ProfileLinks,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self::from_config(&Activity24Config::default())
    }
}

impl ListenerSettings {
    pub fn from_config(config: &Activity24Config) -> Self {
        Self {
            lookback_seconds: config.lookback_seconds(),
            cache_ttl: config.cache_ttl(),
            load_online_guests: config.load_online_guests(),
            table_prefix: config.table_prefix().to_string(),
            revealed_hidden: config.revealed_hidden(),
            capabilities: config.capabilities(),
            links: ProfileLinks::default(),
        }
    }
}

/// The user the page is rendered for.
pub struct Viewer<'a> {
    pub user_id: i64,
    pub auth: &'a dyn Authorizer,
    pub dates: &'a dyn DateFormatter,
}

/// Static text for the admin panel's extension details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsPanel {
    pub title: String,
    pub explain: String,
}

pub struct ActivityListener {
    store: Arc<dyn ActivityStore>,
    cache: Arc<dyn CacheService>,
    lang: Arc<dyn Localizer>,
    hooks: HookPipeline,
    settings: ListenerSettings,
}

impl ActivityListener {
    pub fn new(
        store: Arc<dyn ActivityStore>,
        cache: Arc<dyn CacheService>,
        lang: Arc<dyn Localizer>,
        hooks: HookPipeline,
        settings: ListenerSettings,
    ) -> Self {
        Self { store, cache, lang, hooks, settings }
    }

    /// Contribute the view permission to the host's catalog.
    pub fn register_permissions(catalog: &mut PermissionCatalog) {
        catalog.register(PERM_VIEW_STATS, PERM_VIEW_STATS_LANG, "misc");
    }

    /// Details text when the admin opens this extension's details page.
    pub fn extension_details(&self, ext_name: &str, action: &str) -> Option<DetailsPanel> {
        (ext_name == EXTENSION_NAME && action == "details").then(|| DetailsPanel {
            title: self.lang.lang("A24HOUR_DETAILS_TITLE", &[]),
            explain: self.lang.lang("A24HOUR_DETAILS_EXPLAIN", &[]),
        })
    }

    /// Compute the activity block for `viewer` at time `now`.
    ///
    /// Returns `Ok(None)` without touching store or cache when the viewer
    /// may not see the block. A failed query fails the whole render.
    pub async fn display_stats(&self, viewer: &Viewer<'_>, now: i64) -> Result<Option<ActivityDisplay>, ActivityError> {
        let ctx = ViewerContext::resolve(viewer.auth, viewer.user_id);
        if !ctx.can_view_stats {
            debug!(user_id = viewer.user_id, "Viewer lacks {PERM_VIEW_STATS}; skipping activity block");
            return Ok(None);
        }

        let lookback = self.hooks.look_back(self.settings.lookback_seconds).await;
        let window = compute_window(lookback, now);

        let hour_error = needs_warning(lookback) && ctx.is_admin;
        if needs_warning(lookback) {
            warn!(lookback, "Lookback is below 60 seconds");
        }
        let duration = lookback_string(lookback, self.lang.as_ref());

        let store = self.store.as_ref();
        let cache = self.cache.as_ref();
        let ttl = self.settings.cache_ttl;

        let activity = get_activity_counts(window.threshold, store, cache, &self.hooks, ttl).await?;
        let active_users =
            obtain_active_users(window.threshold, &self.settings.table_prefix, store, cache, &self.hooks, ttl)
                .await?;
        let guests = get_guest_count(window.threshold, store, cache, self.settings.load_online_guests, ttl).await?;

        let caps = self.settings.capabilities;
        let hide_bots = !ctx.is_admin && caps.hide_bots.is_some();
        let date_mode = if caps.relative_dates.is_some() {
            DateMode::Relative
        } else {
            DateMode::Absolute
        };

        let mut classification = classify(
            &active_users,
            &ClassifyContext {
                threshold: window.threshold,
                hide_bots,
                viewer: ctx,
                date_mode,
                revealed_hidden: self.settings.revealed_hidden,
                dates: viewer.dates,
                links: &self.settings.links,
            },
        );
        classification.tally.guests = guests;

        let vars = template_vars(
            &TemplateInputs {
                tally: classification.tally,
                revealed_hidden: self.settings.revealed_hidden,
                activity,
                hide_bots,
                can_view_stats: ctx.can_view_stats,
                tabbed_stat_block: caps.tabbed_stat_block,
                hour_error,
                lookback_string: &duration,
            },
            self.lang.as_ref(),
        );

        let payload = self
            .hooks
            .display(DisplayPayload {
                activity,
                active_users,
                guests,
                template_data: vars,
            })
            .await;

        info!(
            user_id = viewer.user_id,
            threshold = window.threshold,
            visible = classification.tally.visible_users,
            hidden = classification.tally.hidden_users,
            bots = classification.tally.bots,
            guests,
            "Rendered activity block"
        );

        Ok(Some(ActivityDisplay {
            window,
            activity,
            tally: classification.tally,
            vars: payload.template_data,
            lastvisit: classification.visible,
            bot_lastvisit: classification.bots,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ChronoDateFormatter;
    use crate::language::LanguagePack;
    use crate::test_support::{bot, member, CountingStore, NOW};
    use activity24_core::{HideBots, RelativeDates, StaticAuthorizer, PERM_ADMIN, PERM_VIEW_ONLINE};
    use activity24_hooks::{Hook, HookPayload, HookPhase, HookResult, LookBackOverrideHook};
    use activity24_store::MokaCache;
    use async_trait::async_trait;
    use serde_json::json;

    fn listener(store: Arc<CountingStore>, settings: ListenerSettings, hooks: HookPipeline) -> ActivityListener {
        ActivityListener::new(
            store,
            Arc::new(MokaCache::new()),
            Arc::new(LanguagePack::english()),
            hooks,
            settings,
        )
    }

    fn users() -> Vec<activity24_core::UserSession> {
        let mut hidden = member(7, "carol", 100);
        hidden.allow_view_online = false;
        vec![member(2, "alice", 10), hidden, bot(9, "Googlebot", 10, 5)]
    }

    #[tokio::test]
    async fn denied_viewer_gets_nothing_and_no_queries() {
        let store = Arc::new(CountingStore::with_counts(1, 1, 1).with_users(users()));
        let l = listener(store.clone(), ListenerSettings::default(), HookPipeline::default());
        let auth = StaticAuthorizer::default();
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        assert!(l.display_stats(&viewer, NOW).await.unwrap().is_none());
        assert_eq!(store.total_queries(), 0);
    }

    #[tokio::test]
    async fn renders_full_payload() {
        let store = Arc::new(CountingStore::with_counts(12, 3, 1).with_users(users()).with_guests(4));
        let l = listener(store.clone(), ListenerSettings::default(), HookPipeline::default());
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();

        assert_eq!(display.window.threshold, NOW - 86_400);
        assert_eq!(display.activity.posts, 12);
        assert_eq!(display.tally.visible_users, 2);
        assert_eq!(display.tally.hidden_users, 1);
        assert_eq!(display.tally.bots, 1);
        assert_eq!(display.tally.guests, 4);
        assert_eq!(display.lastvisit.len(), 1);
        assert_eq!(display.bot_lastvisit.len(), 1);
        assert_eq!(display.var("USERS_ACTIVE"), Some(&json!(3)));
        assert_eq!(display.var("HOUR_ERROR"), Some(&json!(false)));
        assert_eq!(
            display.var("L_TWENTYFOURHOUR_STATS"),
            Some(&json!("Activity over the last 1 day"))
        );
        assert_eq!(display.var("GUEST_ONLINE_24"), Some(&json!("and 4 guests")));

        // Second render inside the TTL hits the cache for everything.
        l.display_stats(&viewer, NOW + 10).await.unwrap();
        assert_eq!(store.total_queries(), 5);
    }

    #[tokio::test]
    async fn hide_bots_applies_to_non_admins_only() {
        let settings = ListenerSettings {
            capabilities: Capabilities { hide_bots: Some(HideBots), ..Default::default() },
            ..Default::default()
        };
        let store = Arc::new(CountingStore::default().with_users(users()));
        let l = listener(store, settings, HookPipeline::default());
        let dates = ChronoDateFormatter::utc();

        let member_auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let viewer = Viewer { user_id: 50, auth: &member_auth, dates: &dates };
        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
        assert_eq!(display.tally.bots, 0);
        assert_eq!(display.var("BOTS_ACTIVE"), Some(&json!("")));

        let admin_auth = StaticAuthorizer::new([PERM_VIEW_STATS, PERM_ADMIN]);
        let admin = Viewer { user_id: 51, auth: &admin_auth, dates: &dates };
        let display = l.display_stats(&admin, NOW).await.unwrap().unwrap();
        assert_eq!(display.tally.bots, 1);
        assert_eq!(display.var("BOTS_ACTIVE"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn short_lookback_flags_admins_only() {
        let hooks = HookPipeline::default();
        hooks
            .registry
            .register(HookPhase::LookBack, Arc::new(LookBackOverrideHook::new(30)))
            .await;
        let store = Arc::new(CountingStore::default());
        let l = listener(store, ListenerSettings::default(), hooks);
        let dates = ChronoDateFormatter::utc();

        let admin_auth = StaticAuthorizer::new([PERM_VIEW_STATS, PERM_ADMIN]);
        let admin = Viewer { user_id: 2, auth: &admin_auth, dates: &dates };
        let display = l.display_stats(&admin, NOW).await.unwrap().unwrap();
        assert_eq!(display.window.threshold, NOW - 30);
        assert_eq!(display.var("HOUR_ERROR"), Some(&json!(true)));
        assert_eq!(display.var("L_TWENTYFOURHOUR_STATS"), Some(&json!("Activity over the last ")));

        let member_auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let member = Viewer { user_id: 3, auth: &member_auth, dates: &dates };
        let display = l.display_stats(&member, NOW).await.unwrap().unwrap();
        assert_eq!(display.var("HOUR_ERROR"), Some(&json!(false)));
    }

    #[tokio::test]
    async fn hidden_users_revealed_with_view_online() {
        let store = Arc::new(CountingStore::default().with_users(users()));
        let l = listener(store, ListenerSettings::default(), HookPipeline::default());
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS, PERM_VIEW_ONLINE]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
        assert_eq!(display.lastvisit.len(), 2);
        assert!(display.lastvisit[1].contains("<em>carol</em>"));
    }

    #[tokio::test]
    async fn totals_agree_with_rendered_list_under_both_policies() {
        let mut rows = vec![member(2, "amy", 10), member(3, "ben", 10), member(4, "cid", 10)];
        for (id, name) in [(7, "dee"), (8, "eve")] {
            let mut hidden = member(id, name, 10);
            hidden.allow_view_online = false;
            rows.push(hidden);
        }
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS, PERM_VIEW_ONLINE]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        for policy in [RevealedHidden::CountAsVisible, RevealedHidden::HiddenOnly] {
            let settings = ListenerSettings { revealed_hidden: policy, ..Default::default() };
            let store = Arc::new(CountingStore::default().with_users(rows.clone()));
            let l = listener(store, settings, HookPipeline::default());

            let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
            assert_eq!(display.lastvisit.len(), 5);
            assert_eq!(display.tally.hidden_users, 2);
            assert_eq!(display.var("USERS_24HOUR_TOTAL"), Some(&json!("3 registered,")));
            assert_eq!(display.var("HIDDEN_24HOUR_TOTAL"), Some(&json!("2 hidden and")));
            assert_eq!(
                display.var("TOTAL_24HOUR_USERS"),
                Some(&json!("In total there were <strong>5</strong> users :"))
            );
        }
    }

    #[tokio::test]
    async fn relative_dates_change_hover_text() {
        let settings = ListenerSettings {
            capabilities: Capabilities { relative_dates: Some(RelativeDates), ..Default::default() },
            ..Default::default()
        };
        let store = Arc::new(CountingStore::default().with_users(vec![member(2, "alice", 120)]));
        let l = listener(store, settings, HookPipeline::default());
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let dates = ChronoDateFormatter::utc().at(NOW);
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
        assert!(display.lastvisit[0].starts_with("<span title=\"2 minutes ago\">"));
    }

    struct Rebrand;

    #[async_trait]
    impl Hook for Rebrand {
        fn name(&self) -> &str {
            "rebrand"
        }

        async fn run(&self, payload: &HookPayload) -> anyhow::Result<HookResult> {
            let HookPayload::Display(p) = payload else {
                return Ok(HookResult::pass());
            };
            let mut p = p.clone();
            p.template_data.insert("L_TWENTYFOURHOUR_STATS".into(), json!("Today"));
            p.template_data.insert("S_CUSTOM".into(), json!(true));
            Ok(HookResult::transform(HookPayload::Display(p)))
        }
    }

    #[tokio::test]
    async fn display_hook_can_rewrite_payload() {
        let hooks = HookPipeline::default();
        hooks.registry.register(HookPhase::Display, Arc::new(Rebrand)).await;
        let store = Arc::new(CountingStore::default());
        let l = listener(store, ListenerSettings::default(), hooks);
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
        assert_eq!(display.var("L_TWENTYFOURHOUR_STATS"), Some(&json!("Today")));
        assert_eq!(display.var("S_CUSTOM"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn query_failure_fails_the_render() {
        let store = Arc::new(CountingStore::default().failing_on("posts"));
        let l = listener(store, ListenerSettings::default(), HookPipeline::default());
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let err = l.display_stats(&viewer, NOW).await.unwrap_err();
        assert!(matches!(err, ActivityError::QueryFailed { .. }));
    }

    #[tokio::test]
    async fn end_to_end_against_sqlite() {
        use activity24_store::{NewUser, SqliteActivityStore};

        let store = SqliteActivityStore::in_memory("forum_").unwrap();
        store.insert_post(1, NOW - 100).await.unwrap();
        store.insert_post(2, NOW - 100_000).await.unwrap();
        store.insert_topic(1, NOW - 50).await.unwrap();

        let base = NewUser {
            user_id: 0,
            user_type: 0,
            username: "",
            colour: "",
            regdate: NOW - 1_000_000,
            last_visit: 0,
            allow_view_online: true,
        };
        store
            .insert_user(&NewUser { user_id: 2, username: "alice", colour: "AA0000", regdate: NOW - 200, last_visit: NOW - 300, ..base })
            .await
            .unwrap();
        store
            .insert_user(&NewUser { user_id: 3, username: "bob", last_visit: NOW - 500, allow_view_online: false, ..base })
            .await
            .unwrap();
        store
            .insert_user(&NewUser { user_id: 4, user_type: 2, username: "Googlebot", last_visit: NOW - 90_000, ..base })
            .await
            .unwrap();
        store
            .insert_user(&NewUser { user_id: 5, username: "dave", last_visit: NOW - 200_000, ..base })
            .await
            .unwrap();
        store.insert_session("bot", 4, NOW - 60, "66.249.0.1", true).await.unwrap();
        store.insert_session("g1", 1, NOW - 120, "10.0.0.1", true).await.unwrap();
        store.insert_session("g2", 1, NOW - 130, "10.0.0.2", true).await.unwrap();

        let l = ActivityListener::new(
            Arc::new(store),
            Arc::new(MokaCache::new()),
            Arc::new(LanguagePack::english()),
            HookPipeline::default(),
            ListenerSettings::default(),
        );
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
        assert_eq!(display.activity, activity24_core::ActivityCounts { posts: 1, topics: 1, new_users: 1 });
        assert_eq!(display.tally.visible_users, 2);
        assert_eq!(display.tally.hidden_users, 1);
        assert_eq!(display.tally.bots, 1);
        assert_eq!(display.tally.guests, 2);
        assert_eq!(display.lastvisit.len(), 1);
        assert!(display.lastvisit[0].contains("color: #AA0000;"));
        assert!(display.bot_lastvisit[0].contains("Googlebot"));
    }

    #[tokio::test]
    async fn anonymous_account_is_a_guest_not_a_bot() {
        use activity24_core::{ANONYMOUS_USER_ID, USER_TYPE_IGNORE};
        use activity24_store::{NewUser, SqliteActivityStore};

        // The placeholder account carries the crawler type code and is
        // active inside the window through its guest sessions.
        let store = SqliteActivityStore::in_memory("forum_").unwrap();
        store
            .insert_user(&NewUser {
                user_id: ANONYMOUS_USER_ID,
                user_type: USER_TYPE_IGNORE,
                username: "Anonymous",
                colour: "",
                regdate: NOW - 1_000_000,
                last_visit: NOW - 100,
                allow_view_online: true,
            })
            .await
            .unwrap();
        store.insert_session("g1", ANONYMOUS_USER_ID, NOW - 120, "10.0.0.1", true).await.unwrap();
        store.insert_session("g2", ANONYMOUS_USER_ID, NOW - 130, "10.0.0.2", true).await.unwrap();

        let l = ActivityListener::new(
            Arc::new(store),
            Arc::new(MokaCache::new()),
            Arc::new(LanguagePack::english()),
            HookPipeline::default(),
            ListenerSettings::default(),
        );
        let auth = StaticAuthorizer::new([PERM_VIEW_STATS]);
        let dates = ChronoDateFormatter::utc();
        let viewer = Viewer { user_id: 50, auth: &auth, dates: &dates };

        let display = l.display_stats(&viewer, NOW).await.unwrap().unwrap();
        assert_eq!(display.tally.bots, 0);
        assert_eq!(display.tally.visible_users, 0);
        assert_eq!(display.tally.guests, 2);
        assert!(display.bot_lastvisit.is_empty());
        assert!(display.lastvisit.is_empty());
    }

    #[test]
    fn registers_view_permission_in_misc() {
        let mut catalog = PermissionCatalog::new();
        ActivityListener::register_permissions(&mut catalog);
        let entry = catalog.get(PERM_VIEW_STATS).unwrap();
        assert_eq!(entry.lang, "ACL_U_A24HRS_VIEW");
        assert_eq!(entry.cat, "misc");
    }

    #[test]
    fn details_only_for_this_extension() {
        let l = listener(Arc::new(CountingStore::default()), ListenerSettings::default(), HookPipeline::default());
        assert!(l.extension_details(EXTENSION_NAME, "details").is_some());
        assert!(l.extension_details(EXTENSION_NAME, "enable").is_none());
        assert!(l.extension_details("other/ext", "details").is_none());
    }
}
