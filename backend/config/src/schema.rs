//! Activity statistics configuration schema.
//!
//! Every field is optional in the YAML file; `defaults::apply_all_defaults`
//! fills the gaps and the accessor methods read the effective values.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use activity24_core::{Capabilities, HideBots, RelativeDates, RevealedHidden};
use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_LOG_LEVEL, DEFAULT_LOOKBACK_SECS, DEFAULT_TABLE_PREFIX,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity24Config {
    /// Seconds of history the block covers (86400 = 24 hours).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback_seconds: Option<i64>,

    /// Lifetime of cached counts and user lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_seconds: Option<u64>,

    /// Guest tracking; when off the guest count is always zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_online_guests: Option<bool>,

    /// Prefix of the forum tables (`forum_posts`, `forum_users`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_prefix: Option<String>,

    /// Tally rule for hidden users shown to privileged viewers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revealed_hidden: Option<RevealedHidden>,

    /// Sibling extensions installed alongside this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ExtensionsConfig>,

    /// Language overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_bots: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_dates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabbed_stat_block: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    /// Key → replacement text. Plural keys take `one` / `other` maps.
    #[serde(default)]
    pub overrides: HashMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// When set, JSON logs are also written here with daily rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Activity24Config {
    pub fn lookback_seconds(&self) -> i64 {
        self.lookback_seconds.unwrap_or(DEFAULT_LOOKBACK_SECS)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn load_online_guests(&self) -> bool {
        self.load_online_guests.unwrap_or(true)
    }

    pub fn table_prefix(&self) -> &str {
        self.table_prefix.as_deref().unwrap_or(DEFAULT_TABLE_PREFIX)
    }

    pub fn revealed_hidden(&self) -> RevealedHidden {
        self.revealed_hidden.unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging.as_ref().and_then(|l| l.dir.as_ref())
    }

    /// Capabilities derived from the installed sibling extensions.
    pub fn capabilities(&self) -> Capabilities {
        let ext = self.extensions.clone().unwrap_or_default();
        Capabilities {
            hide_bots: ext.hide_bots.unwrap_or(false).then_some(HideBots),
            relative_dates: ext.relative_dates.unwrap_or(false).then_some(RelativeDates),
            tabbed_stat_block: ext.tabbed_stat_block.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
lookbackSeconds: 604800
loadOnlineGuests: false
revealedHidden: hiddenOnly
extensions:
  hideBots: true
  relativeDates: true
language:
  overrides:
    TWENTYFOURHOUR_STATS: "Activity over the last"
"#;
        let cfg: Activity24Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.lookback_seconds(), 604_800);
        assert!(!cfg.load_online_guests());
        assert_eq!(cfg.revealed_hidden(), RevealedHidden::HiddenOnly);
        let caps = cfg.capabilities();
        assert_eq!(caps.hide_bots, Some(HideBots));
        assert_eq!(caps.relative_dates, Some(RelativeDates));
        assert!(!caps.tabbed_stat_block);
        assert!(cfg.language.unwrap().overrides.contains_key("TWENTYFOURHOUR_STATS"));
    }

    #[test]
    fn empty_config_reads_defaults() {
        let cfg = Activity24Config::default();
        assert_eq!(cfg.lookback_seconds(), 86_400);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(300));
        assert!(cfg.load_online_guests());
        assert_eq!(cfg.table_prefix(), "forum_");
        assert_eq!(cfg.capabilities(), Capabilities::default());
    }
}
