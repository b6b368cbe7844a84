//! Logging — tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::settings::{LogFormat, LoggingSettings};

/// Install the global subscriber. Logs go to stderr; stdout carries reports.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    match settings.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}
