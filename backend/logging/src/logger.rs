//! Structured Logger
//!
//! Wraps `tracing` to provide console output, an optional rolling NDJSON file,
//! and environment-based level control.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix for the daily log files.
const LOG_FILE_PREFIX: &str = "taskpilot.log";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for the rolling NDJSON file; console only when `None`.
    pub dir: Option<PathBuf>,
    /// Emit JSON on the console instead of the human format.
    pub json_console: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            json_console: false,
        }
    }
}

/// Initialize the global structured logger.
///
/// Console output goes to stderr so that command results printed on stdout
/// stay machine-readable. Calling this twice is a no-op.
pub fn init_logger(options: &LogOptions) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    let console_layer = if options.json_console {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    // Rolling file appender: writes NDJSON to `<dir>/taskpilot.log.YYYY-MM-DD`
    let file_layer = options.dir.as_ref().map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_console_only() {
        let opts = LogOptions::default();
        assert_eq!(opts.level, "info");
        assert!(opts.dir.is_none());
        assert!(!opts.json_console);
    }

    #[test]
    fn init_twice_does_not_panic() {
        let opts = LogOptions::default();
        init_logger(&opts);
        init_logger(&opts);
    }
}
