//! Run log setup.
//!
//! Each run truncates the log file and installs a `tracing` subscriber that
//! writes timestamped, leveled lines to it.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

/// File name of the run log, placed next to the executable.
pub const LOG_FILE_NAME: &str = "organizer.log";

/// Default log location: beside the running executable, or the current
/// directory when that cannot be determined.
pub fn default_log_path() -> PathBuf {
    crate::config::install_dir().join(LOG_FILE_NAME)
}

/// Truncates `path` and routes all `tracing` events at INFO and above into it.
///
/// Debug events are included when `debug` is set. Fails if the file cannot be
/// created or a global subscriber is already installed.
pub fn init(path: &Path, debug: bool) -> io::Result<()> {
    let file = File::create(path)?;
    let level = if debug { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}
