//! File sink for the file logging layer.

use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;

use crate::logger::{FileConfig, LoggerError};

/// Opens the configured log file, creating parent directories as needed.
///
/// The returned `Mutex<File>` implements `MakeWriter` and can be handed to a
/// `fmt::layer()` directly.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    let file = options.open(&config.path)?;
    Ok(Mutex::new(file))
}
