// Process-wide log setup for the binaries
// The library logs through `log`; records are bridged into a tracing
// registry with a stdout layer and an optional append-only file layer.
// RUST_LOG overrides the configured level.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use log::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::error::{Error, Result};

pub const DEFAULT_LOG_FILE: &str = "/var/log/eink-app.log";

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(format!("opening log file {}", path.display()), e))
}

/// Installs the global subscriber. A log file that cannot be opened is
/// reported once on stdout and otherwise ignored. Returns whether file
/// logging is active.
pub fn init(level: &str, file: Option<&Path>) -> bool {
    let (file, file_err) = match file.map(open_log) {
        Some(Ok(f)) => (Some(f), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let to_file = file.is_some();

    let file_layer = file.map(|f| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(f))
    });
    let subscriber = tracing_subscriber::registry()
        .with(filter(level))
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .with(file_layer);

    // a second init (tests, embedding) keeps the first subscriber
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = tracing_log::LogTracer::init();
    }

    if let Some(e) = file_err {
        warn!("{e}; logging to stdout only");
    }
    to_file
}
