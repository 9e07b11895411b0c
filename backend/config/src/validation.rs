//! Config validation: field checks with user-friendly messages.

use crate::schema::Activity24Config;
use thiserror::Error;

/// Below this the block is practically empty and queries run every page.
pub const MIN_SUPPORTED_LOOKBACK_SECS: i64 = 60;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &Activity24Config) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_window(config, &mut report);
    validate_cache(config, &mut report);
    validate_tables(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_window(config: &Activity24Config, report: &mut ValidationReport) {
    let Some(secs) = config.lookback_seconds else { return };
    if secs < 0 {
        report.error("lookbackSeconds", "Lookback cannot be negative");
    } else if secs < MIN_SUPPORTED_LOOKBACK_SECS {
        report.warn(
            "lookbackSeconds",
            format!("Lookback of {secs}s is below {MIN_SUPPORTED_LOOKBACK_SECS}s; admins will see a warning"),
        );
    }
}

fn validate_cache(config: &Activity24Config, report: &mut ValidationReport) {
    if config.cache_ttl_seconds == Some(0) {
        report.error("cacheTtlSeconds", "Cache TTL must be at least one second");
    }
}

fn validate_tables(config: &Activity24Config, report: &mut ValidationReport) {
    let Some(prefix) = &config.table_prefix else { return };
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        report.error(
            "tablePrefix",
            format!("Table prefix '{prefix}' may only contain letters, digits and underscores"),
        );
    }
}

fn validate_logging(config: &Activity24Config, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    if !matches!(
        level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    ) {
        report.warn("logging.level", format!("Unknown log level '{level}'; env filter syntax assumed"));
    }
}
