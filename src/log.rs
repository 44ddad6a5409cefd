// src/log.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "sfc_scrape=info";

/// Install the global subscriber: human-readable lines on stderr plus a
/// plain-text copy appended to `log_file`. `RUST_LOG` overrides the level.
///
/// If the log file can't be opened the run still logs to stderr.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(log_file: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let file_layer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .ok()
        .map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
}
