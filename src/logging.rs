//! File logging for the workbench.
//!
//! Intake, decoding, stale-load discards and exports emit `tracing` events; they land in
//! `sheetbench.log` next to the working directory unless a path is given.

use color_eyre::Result;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Log at WARN to the default file
pub fn init() -> Result<()> {
    init_with(None, None)
}

/// Log to `log_path` (default: `sheetbench.log` in the working directory).
///
/// `level` wins over `RUST_LOG`; without either, only warnings and errors are kept.
pub fn init_with(log_path: Option<PathBuf>, level: Option<Level>) -> Result<()> {
    let log_path = match log_path {
        Some(path) => path,
        None => std::env::current_dir()?.join(LOG_FILE.as_str()),
    };
    let file = open_log(&log_path)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.unwrap_or(Level::WARN).into())
        .from_env_lossy();

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

/// Append-open the log file, creating missing parent directories
fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
