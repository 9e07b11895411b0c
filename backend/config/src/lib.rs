//! `activity24-config`: configuration for the activity statistics block.
//!
//! Provides:
//! - Typed config schema (window, cache, guests, extensions, language, logging)
//! - YAML read/write
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{Activity24Config, ExtensionsConfig, LanguageConfig, LoggingConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport, MIN_SUPPORTED_LOOKBACK_SECS};

use activity24_core::ActivityError;
use std::path::Path;

/// Load, apply defaults, and validate a config file.
///
/// Warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<Activity24Config, ActivityError> {
    let config = load_config(path).await?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        return Err(ActivityError::Config(first.to_string()));
    }

    Ok(apply_all_defaults(config))
}
