//! Structured logging setup for the activity statistics tools.

pub mod logger;

pub use logger::init_logger;
