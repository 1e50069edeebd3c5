//! Structured logging initialization.
//!
//! Log lines go to stderr so they never interleave with paged output.
//! The RUST_LOG environment variable takes precedence over configuration file settings.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging subsystem.
///
/// The RUST_LOG environment variable takes precedence over the configuration
/// file level setting. If RUST_LOG is not set, the level from config is used.
///
/// # Example
///
/// ```ignore
/// use mpager::logging;
/// use mpager::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// logging::init(&config);
///
/// tracing::warn!("swap file is growing");
/// ```
pub fn init(config: &LoggingConfig) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.level.as_str())
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.target)
        .with_thread_names(config.thread_names);

    match (config.format, config.timestamps) {
        (LogFormat::Pretty, true) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.pretty())
                .init();
        }
        (LogFormat::Pretty, false) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.pretty().without_time())
                .init();
        }
        (LogFormat::Json, true) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        }
        (LogFormat::Json, false) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json().without_time())
                .init();
        }
        (LogFormat::Compact, true) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact())
                .init();
        }
        (LogFormat::Compact, false) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.compact().without_time())
                .init();
        }
    }
}
