//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{Activity24Config, ExtensionsConfig, LoggingConfig};

/// Default lookback: 24 hours.
pub const DEFAULT_LOOKBACK_SECS: i64 = 86_400;

/// Cached counts and user lists live for five minutes.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

pub const DEFAULT_TABLE_PREFIX: &str = "forum_";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: Activity24Config) -> Activity24Config {
    let config = apply_window_defaults(config);
    let config = apply_extension_defaults(config);
    apply_logging_defaults(config)
}

fn apply_window_defaults(mut config: Activity24Config) -> Activity24Config {
    config.lookback_seconds.get_or_insert(DEFAULT_LOOKBACK_SECS);
    config.cache_ttl_seconds.get_or_insert(DEFAULT_CACHE_TTL_SECS);
    config.load_online_guests.get_or_insert(true);
    config
        .table_prefix
        .get_or_insert_with(|| DEFAULT_TABLE_PREFIX.to_string());
    config.revealed_hidden.get_or_insert_with(Default::default);
    config
}

/// Missing extension flags mean "not installed".
fn apply_extension_defaults(mut config: Activity24Config) -> Activity24Config {
    let ext = config.extensions.get_or_insert_with(ExtensionsConfig::default);
    ext.hide_bots.get_or_insert(false);
    ext.relative_dates.get_or_insert(false);
    ext.tabbed_stat_block.get_or_insert(false);
    config
}

fn apply_logging_defaults(mut config: Activity24Config) -> Activity24Config {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
