//! ImageSpectator Logging & Observability
//!
//! Provides structured logging, panic handling and crash reports.

mod panic_hook;
mod logging;

pub use panic_hook::{crash_report, init_panic_hook};
pub use logging::{cleanup_logs_in, cleanup_old_logs, init_logging};
pub use tracing_appender::non_blocking::WorkerGuard;

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "ImageSpectator", "ImageSpectator")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features.
///
/// `default_level` is used when `RUST_LOG` is not set. The returned guard
/// flushes the log file on drop and must be kept alive by the caller.
pub fn init(default_level: &str) -> anyhow::Result<WorkerGuard> {
    let guard = init_logging(default_level)?;
    init_panic_hook();
    Ok(guard)
}
