use crate::error::{Result, WarehouseError};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the console and log-file subscribers.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the lifetime of the process.
pub fn init_logging(verbose: bool, log_file: &Path) -> Result<WorkerGuard> {
    let level = if verbose { "debug" } else { "info" };

    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = log_file.file_name().ok_or_else(|| {
        WarehouseError::Config(format!("Invalid log file path: {}", log_file.display()))
    })?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        );

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| WarehouseError::Config(format!("Logging already initialised: {}", e)))?;

    Ok(guard)
}
