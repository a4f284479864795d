//! Append-only update log (`assets/DEPLOYMENT.log`).

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use maqeal_shared::{MaqealError, Result};

/// Timestamp format of each log line, in local time.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Appends `<timestamp> - <message>` lines to a log file.
#[derive(Debug, Clone)]
pub struct UpdateLog {
    path: PathBuf,
}

impl UpdateLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file (and its directory) if needed.
    pub fn append(&self, message: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| MaqealError::io(dir, e))?;
        }

        let line = format_entry(&Local::now().format(TIMESTAMP_FORMAT).to_string(), message);

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MaqealError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| MaqealError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), entry = message, "update logged");
        Ok(())
    }
}

fn format_entry(timestamp: &str, message: &str) -> String {
    format!("{timestamp} - {message}\n")
}
