//! Error types for Pomodoro
//!
//! All modules use `PomodoroResult<T>` as their return type. Cache file
//! decoding has its own [`DecodeError`] since a decode failure is always
//! recovered locally and never reaches a lookup caller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Pomodoro operations
pub type PomodoroResult<T> = Result<T, PomodoroError>;

/// All errors that can occur in Pomodoro
#[derive(Error, Debug)]
pub enum PomodoroError {
    // Source catalog errors
    #[error("Catalog source not readable: {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to import catalog {path}: {reason}")]
    CatalogImport { path: PathBuf, reason: String },

    // Persistence errors
    #[error("Cache file {path} failed verification: end marker missing")]
    CommitVerification { path: PathBuf },

    #[error("Failed to remove {failed} of {total} cache file(s)")]
    PruneFailed { failed: usize, total: usize },

    #[error("{count} cache file(s) failed lint")]
    LintFailed { count: usize },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl PomodoroError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CommitVerification { .. } => {
                Some("Check free space in the cache directory; the previous cache file is untouched")
            }
            Self::PruneFailed { .. } => Some("Check permissions on the cache directory"),
            Self::LintFailed { .. } => Some("Run: pomodoro prune to discard broken cache files"),
            Self::ConfigInvalid { .. } => Some("Run: pomodoro config show to inspect the effective configuration"),
            _ => None,
        }
    }
}

/// Reasons a persisted cache file could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("cache file is not valid UTF-8")]
    NotUtf8,

    #[error("cache file is missing its end marker")]
    MissingSentinel,

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl DecodeError {
    /// Line the failure was detected on, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }
}
