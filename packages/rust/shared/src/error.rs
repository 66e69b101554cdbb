//! Error types for SteepleScout.
//!
//! Library crates use [`SteepleScoutError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SteepleScout operations.
///
/// Only [`Directory`](Self::Directory) and [`Connection`](Self::Connection)
/// abort a run; every other variant is contained at its stage boundary.
#[derive(Debug, thiserror::Error)]
pub enum SteepleScoutError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Seed directory unreachable or unparseable. Fatal for the run.
    #[error("directory error: {0}")]
    Directory(String),

    /// An organization's homepage could not be fetched or scanned.
    #[error("site page error: {0}")]
    SitePage(String),

    /// A staff page could not be fetched or its markup extracted.
    #[error("staff extraction error: {0}")]
    Extraction(String),

    /// Database write or query error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Store connection could not be established at run start. Fatal.
    #[error("connection error: {0}")]
    Connection(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SteepleScoutError>;

impl SteepleScoutError {
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

    /// Whether this error aborts the whole run rather than one organization.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Directory(_) | Self::Connection(_))
    }
}
