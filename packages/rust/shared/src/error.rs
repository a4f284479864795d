//! Error types for ma-qeal.
//!
//! Library crates use [`MaqealError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics and a non-zero exit.

use std::path::PathBuf;

/// Top-level error type for all ma-qeal operations.
#[derive(Debug, thiserror::Error)]
pub enum MaqealError {
    /// The quote catalog is unreadable or not valid JSON.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// No quote could be selected (empty or unreadable catalog, unknown id).
    #[error("no quote found: {message}")]
    NotFound { message: String },

    /// The target document is missing, unreadable, or empty.
    #[error("document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    /// The target document has no `<!-- QUOTE:START -->` / `<!-- QUOTE:END -->` region.
    #[error("no quote markers in {}", path.display())]
    MarkersNotFound { path: PathBuf },

    /// Network failure, empty response, or the remote page did not have the expected shape.
    #[error("fetch error: {message}")]
    Fetch { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MaqealError>;

impl MaqealError {
    /// Create a storage error from any displayable message.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
        }
    }

    /// Create a not-found error from any displayable message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create a fetch error from any displayable message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
