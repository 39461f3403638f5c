//! File logging for interactive sessions.
//!
//! The terminal belongs to the TUI while a game runs, so every event goes
//! to `wl.log` in the data directory instead.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "wl.log";
const DEFAULT_DIRECTIVES: &str = "warn,wl=debug,wl_core=debug,wl_battle=debug,wl_story=debug,wl_tui=debug";

/// Install the global subscriber. `RUST_LOG` replaces the default filter.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path) -> Result<WorkerGuard, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create log directory '{}': {e}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .map_err(|e| format!("cannot open log file: {e}"))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| format!("failed to start logging: {e}"))?;
    Ok(guard)
}
