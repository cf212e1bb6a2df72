use std::path::PathBuf;

use color_eyre::eyre::{Result, eyre};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_DIR: &str = "quickpage";
const LOG_FILE: &str = "quickpage.log";

/// Sends the logs to a file, the terminal belongs to the UI.
/// `RUST_LOG` takes precedence over the verbosity flag.
/// Keep the guard alive until the end of `main` so the logs are flushed.
pub fn init(verbose: u8) -> Result<WorkerGuard> {
    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    // The core crate logs through `log`
    tracing_log::LogTracer::init()?;

    tracing::debug!("Logging to {}", log_dir.join(LOG_FILE).display());
    Ok(guard)
}

fn log_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(LOG_DIR))
        .ok_or_else(|| eyre!("Cache directory not found"))
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
