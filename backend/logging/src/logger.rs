//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control, a console layer,
//! and an optional daily-rotated JSON file layer.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name stem; the appender adds the date suffix.
const LOG_FILE_NAME: &str = "activity24.log";

/// Build the level filter. `RUST_LOG` takes precedence over `level`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global logger.
///
/// Console output always goes to stderr so stdout stays clean for payloads.
/// When `log_dir` is given, NDJSON is also written to
/// `<log_dir>/activity24.log.YYYY-MM-DD`. Calling this twice is a no-op.
pub fn init_logger(level: &str, log_dir: Option<&Path>) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
