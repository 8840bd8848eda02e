//! Error types for organize, apply and undo runs.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Errors that can occur while planning, applying or undoing moves.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// The directory to organize does not exist.
    #[error("Root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The move log passed to undo does not exist.
    #[error("Undo log not found: {path}")]
    UndoLogNotFound { path: PathBuf },

    /// The root directory could not be read.
    #[error("Failed to read directory {path}: {source}")]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A destination directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single relocation failed.
    #[error("Failed to move {from} to {to}: {source}")]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An apply run stopped part way; the completed moves were logged.
    #[error("Apply aborted after {completed} completed move(s): {source}")]
    PartialApply {
        completed: usize,
        log_path: Option<PathBuf>,
        #[source]
        source: Box<OrganizeError>,
    },

    /// The move log could not be written.
    #[error("Failed to write move log {path}: {source}")]
    LogWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The move log could not be read.
    #[error("Failed to read move log {path}: {source}")]
    LogReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The move log is not a JSON array of `{src, dst}` records.
    #[error("Invalid move log {path}: {reason}")]
    InvalidLogFormat { path: PathBuf, reason: String },

    /// Configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OrganizeError {
    /// Process exit code for this error.
    ///
    /// Missing inputs exit with 2 before anything is touched; everything else
    /// exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RootNotFound { .. } | Self::UndoLogNotFound { .. } => 2,
            _ => 1,
        }
    }
}
