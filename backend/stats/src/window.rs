//! Lookback window and its human-readable duration.

use activity24_core::{LangArg, Localizer, Window};

pub const SECONDS_IN_MINUTE: i64 = 60;
pub const SECONDS_IN_HOUR: i64 = 3_600;
pub const SECONDS_IN_DAY: i64 = 24 * SECONDS_IN_HOUR;

/// Shortest lookback that does not trigger the admin warning.
pub const MIN_LOOKBACK_SECONDS: i64 = 60;

pub fn compute_window(lookback_seconds: i64, now: i64) -> Window {
    Window {
        now,
        lookback_seconds,
        threshold: now - lookback_seconds,
    }
}

/// True when the lookback is short enough to be a likely misconfiguration.
pub fn needs_warning(lookback_seconds: i64) -> bool {
    lookback_seconds < MIN_LOOKBACK_SECONDS
}

/// Whole days, hours and minutes of a duration; leftover seconds are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl DurationParts {
    /// Negative input yields all zeros.
    pub fn from_seconds(seconds: i64) -> Self {
        let seconds = seconds.max(0);
        let days = seconds / SECONDS_IN_DAY;
        let hour_seconds = seconds % SECONDS_IN_DAY;
        let hours = hour_seconds / SECONDS_IN_HOUR;
        let minutes = (hour_seconds % SECONDS_IN_HOUR) / SECONDS_IN_MINUTE;
        Self { days, hours, minutes }
    }
}

/// Render e.g. "1 day, 2 hours and 3 minutes" through the language pack.
pub fn lookback_string(lookback_seconds: i64, lang: &dyn Localizer) -> String {
    let parts = DurationParts::from_seconds(lookback_seconds);
    let sections = [
        ("24HOUR_DAY", parts.days),
        ("24HOUR_HOUR", parts.hours),
        ("24HOUR_MIN", parts.minutes),
    ];

    let timeparts: Vec<String> = sections
        .iter()
        .filter(|(_, value)| *value > 0)
        .map(|(key, value)| lang.lang(key, &[LangArg::Int(*value)]))
        .collect();

    match timeparts.as_slice() {
        [a, b, c] => format!(
            "{a}{}{b}{}{c}",
            lang.lang("COMMA_SEPARATOR", &[]),
            lang.lang("24HOUR_AND", &[])
        ),
        [a, b] => format!("{a}{}{b}", lang.lang("24HOUR_AND", &[])),
        [a] => a.clone(),
        _ => String::new(),
    }
}
