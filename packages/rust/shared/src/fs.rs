//! Whole-file writes shared by the catalog and the publisher.

use std::path::{Path, PathBuf};

use crate::error::{MaqealError, Result};

/// Replace `path` with `content` atomically (write to temp, then rename).
///
/// The temp file is `.<name>.tmp` in the same directory so the rename never
/// crosses filesystems.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp = temp_path(path);
    std::fs::write(&temp, content).map_err(|e| MaqealError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| MaqealError::io(path, e))?;
    Ok(())
}

/// Sibling temp path used by [`write_atomic`].
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".into());
    path.with_file_name(format!(".{name}.tmp"))
}
