//! Logging for databurn runs.
//!
//! Two layers:
//! - the global `tracing` subscriber, used by library code through the
//!   `tracing` macros
//! - a per-run [`RunLogger`] writing a dedicated log file, forwarding lines
//!   to an optional UI callback, and keeping a tail of recent OCR text and
//!   tool output for failure reports
//!
//! # Example
//!
//! ```no_run
//! use databurn_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("reel_04", "/tmp/databurn/logs", LogConfig::default(), None).unwrap();
//!
//! logger.phase("Recognize");
//! logger.command("tesseract frame_000001.png stdout --psm 6");
//! logger.frame_text(1, "TC: 01:00:00:00 Filename: A.mov");
//! logger.progress(50);
//! logger.success("Wrote 12 events");
//! ```

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub(crate) use run_logger::sanitize_filename;
pub use types::{LogConfig, LogLevel, MessagePrefix, UiLogCallback};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Output goes to stderr.
/// Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
