//! Log output configuration.
//!
//! Installs the global subscriber: a stdout layer always, plus a
//! non-blocking file layer when a log path is given. Pipeline code only
//! emits `tracing` events and never touches sinks, so tests can install
//! their own subscribers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// The returned guard must stay alive for the life of the process;
/// dropping it flushes and closes the file writer.
pub fn init(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // RUST_LOG overrides, otherwise everything at info and above
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_ansi(true);

    let path = match log_file {
        Some(path) => path,
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .init();
            return Ok(None);
        }
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("Log path {} has no file name", path.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
