use activity24_core::{DateFormatter, DateMode};
use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Board default: "Sat Oct 17, 2026 3:04 pm".
pub const DEFAULT_DATE_FORMAT: &str = "%a %b %d, %Y %-I:%M %P";

/// Date formatter for one viewer: their format string and UTC offset.
#[derive(Debug, Clone)]
pub struct ChronoDateFormatter {
    format: String,
    offset: FixedOffset,
    /// Reference point for relative dates; `None` means the wall clock.
    now: Option<i64>,
}

impl ChronoDateFormatter {
    pub fn new(format: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            format: format.into(),
            offset,
            now: None,
        }
    }

    pub fn utc() -> Self {
        Self::new(DEFAULT_DATE_FORMAT, Utc.fix())
    }

    /// Pin "now" for relative output.
    pub fn at(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }

    fn absolute(&self, timestamp: i64) -> String {
        match DateTime::from_timestamp(timestamp, 0) {
            Some(dt) => dt.with_timezone(&self.offset).format(&self.format).to_string(),
            None => String::new(),
        }
    }

    fn relative(&self, timestamp: i64) -> String {
        let now = self.now.unwrap_or_else(|| Utc::now().timestamp());
        let elapsed = now - timestamp;
        let (n, unit) = match elapsed {
            e if e < 60 => return "less than a minute ago".to_string(),
            e if e < 3_600 => (e / 60, "minute"),
            e if e < 86_400 => (e / 3_600, "hour"),
            e => (e / 86_400, "day"),
        };
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    }
}

impl DateFormatter for ChronoDateFormatter {
    fn format_date(&self, timestamp: i64, mode: DateMode) -> String {
        match mode {
            DateMode::Absolute => self.absolute(timestamp),
            DateMode::Relative => self.relative(timestamp),
        }
    }
}
