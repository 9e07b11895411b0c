//! Language pack with plural forms and printf-style placeholders.
//!
//! Placeholders: `%d` and `%s` consume arguments in order, `%1$s` / `%2$d`
//! address them by position, `%%` is a literal percent sign.

use std::collections::HashMap;

use activity24_core::{LangArg, Localizer};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LangEntry {
    Text(String),
    Plural {
        #[serde(default)]
        zero: Option<String>,
        one: String,
        other: String,
    },
}

impl LangEntry {
    fn plural(one: &str, other: &str) -> Self {
        Self::Plural {
            zero: None,
            one: one.to_string(),
            other: other.to_string(),
        }
    }

    fn pick(&self, count: Option<i64>) -> &str {
        match self {
            Self::Text(text) => text.as_str(),
            Self::Plural { zero, one, other } => match count {
                Some(0) => zero.as_deref().unwrap_or(other.as_str()),
                Some(1) => one.as_str(),
                _ => other.as_str(),
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LanguagePack {
    entries: HashMap<String, LangEntry>,
}

impl LanguagePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English strings.
    pub fn english() -> Self {
        let mut pack = Self::new();
        let text = [
            ("TWENTYFOURHOUR_STATS", "Activity over the last"),
            ("24HOUR_AND", " and "),
            ("COMMA_SEPARATOR", ", "),
            ("ACL_U_A24HRS_VIEW", "Can view the activity over the last 24 hours"),
            ("A24HOUR_DETAILS_TITLE", "Activity 24 hours"),
            (
                "A24HOUR_DETAILS_EXPLAIN",
                "Shows new posts, topics, users and who was online during the lookback window on the board index.",
            ),
        ];
        for (key, value) in text {
            pack.insert(key, LangEntry::Text(value.to_string()));
        }

        pack.insert("24HOUR_DAY", LangEntry::plural("%d day", "%d days"));
        pack.insert("24HOUR_HOUR", LangEntry::plural("%d hour", "%d hours"));
        pack.insert("24HOUR_MIN", LangEntry::plural("%d minute", "%d minutes"));
        pack.insert("24HOUR_TOPICS", LangEntry::plural("New topic <strong>%d</strong>", "New topics <strong>%d</strong>"));
        pack.insert("24HOUR_POSTS", LangEntry::plural("New post <strong>%d</strong>", "New posts <strong>%d</strong>"));
        pack.insert("24HOUR_USERS", LangEntry::plural("New user <strong>%d</strong>", "New users <strong>%d</strong>"));
        pack.insert(
            "TOTAL_24HOUR_USERS",
            LangEntry::Plural {
                zero: Some("In total there were <strong>0</strong> users :".into()),
                one: "In total there was <strong>%d</strong> user :".into(),
                other: "In total there were <strong>%d</strong> users :".into(),
            },
        );
        pack.insert("USERS_24HOUR_TOTAL", LangEntry::plural("%d registered,", "%d registered,"));
        pack.insert("HIDDEN_24HOUR_TOTAL", LangEntry::plural("%d hidden and", "%d hidden and"));
        pack.insert("BOTS_24HOUR_TOTAL", LangEntry::plural("%d bot", "%d bots"));
        pack.insert("GUEST_ONLINE_24", LangEntry::plural("and %d guest", "and %d guests"));
        pack
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: LangEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Apply overrides from config. Entries that are neither a string nor a
    /// `one`/`other` map are skipped with a warning.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, serde_yaml::Value>) {
        for (key, value) in overrides {
            match serde_yaml::from_value::<LangEntry>(value.clone()) {
                Ok(entry) => self.insert(key.clone(), entry),
                Err(e) => warn!(key = %key, error = %e, "Ignoring malformed language override"),
            }
        }
    }
}

impl Localizer for LanguagePack {
    fn lang(&self, key: &str, args: &[LangArg]) -> String {
        let Some(entry) = self.entries.get(key) else {
            // Unknown keys render as themselves so gaps are visible.
            return key.to_string();
        };
        let count = args.iter().find_map(|a| match a {
            LangArg::Int(n) => Some(*n),
            LangArg::Str(_) => None,
        });
        format_placeholders(entry.pick(count), args)
    }
}

fn arg_text(arg: Option<&LangArg>, numeric: bool) -> String {
    match (arg, numeric) {
        (Some(LangArg::Int(n)), _) => n.to_string(),
        (Some(LangArg::Str(s)), false) => s.clone(),
        (Some(LangArg::Str(s)), true) => s.trim().parse::<i64>().unwrap_or(0).to_string(),
        (None, true) => "0".to_string(),
        (None, false) => String::new(),
    }
}

fn format_placeholders(template: &str, args: &[LangArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(kind @ ('d' | 's')) => {
                chars.next();
                out.push_str(&arg_text(args.get(next_arg), kind == 'd'));
                next_arg += 1;
            }
            Some(d) if d.is_ascii_digit() => {
                // Positional form: %N$s / %N$d
                let mut lookahead = chars.clone();
                let mut digits = String::new();
                while let Some(&ch) = lookahead.peek() {
                    if ch.is_ascii_digit() {
                        digits.push(ch);
                        lookahead.next();
                    } else {
                        break;
                    }
                }
                let dollar = lookahead.next();
                let kind = lookahead.next();
                match (dollar, kind, digits.parse::<usize>()) {
                    (Some('$'), Some(k @ ('d' | 's')), Ok(pos)) if pos > 0 => {
                        out.push_str(&arg_text(args.get(pos - 1), k == 'd'));
                        chars = lookahead;
                    }
                    _ => out.push('%'),
                }
            }
            _ => out.push('%'),
        }
    }
    out
}
