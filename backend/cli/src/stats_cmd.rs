//! `activity24 stats`: render the block against a SQLite forum database.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use activity24_config::Activity24Config;
use activity24_core::{StaticAuthorizer, PERM_VIEW_STATS};
use activity24_hooks::{HookPhase, HookPipeline, HookRegistry, LoggingHook};
use activity24_stats::{ActivityListener, ChronoDateFormatter, LanguagePack, ListenerSettings, Viewer};
use activity24_store::{MokaCache, SqliteActivityStore};

pub struct StatsArgs {
    pub db: PathBuf,
    pub viewer: i64,
    pub grants: Vec<String>,
    pub now: i64,
    pub trace_hooks: bool,
}

pub async fn run(config: &Activity24Config, lang: LanguagePack, args: StatsArgs) -> Result<()> {
    let settings = ListenerSettings::from_config(config);
    let store = SqliteActivityStore::open(&args.db, &settings.table_prefix)?;
    info!(db = %args.db.display(), prefix = %settings.table_prefix, "Opened forum database");

    let registry = HookRegistry::new();
    if args.trace_hooks {
        let hook = Arc::new(LoggingHook::new("cli"));
        for phase in [
            HookPhase::LookBack,
            HookPhase::SqlQuery,
            HookPhase::ActiveUsers,
            HookPhase::Activity,
            HookPhase::Display,
        ] {
            registry.register(phase, hook.clone()).await;
        }
    }

    let listener = ActivityListener::new(
        Arc::new(store),
        Arc::new(MokaCache::new()),
        Arc::new(lang),
        HookPipeline::new(registry),
        settings,
    );

    let auth = StaticAuthorizer::new(args.grants);
    let dates = ChronoDateFormatter::utc().at(args.now);
    let viewer = Viewer {
        user_id: args.viewer,
        auth: &auth,
        dates: &dates,
    };

    match listener.display_stats(&viewer, args.now).await? {
        Some(display) => println!("{}", serde_json::to_string_pretty(&display.to_flat_map())?),
        None => println!("Viewer {} lacks the {PERM_VIEW_STATS} permission; nothing to show.", args.viewer),
    }

    Ok(())
}
