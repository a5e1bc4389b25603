//! Error types for xlineslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning, counting or editing exclusions
#[derive(Error, Debug)]
pub enum XlinesError {
    /// The exclusion file is missing or could not be read
    #[error("exclusion list unavailable at '{path}': {source}")]
    ConfigUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No platform configuration directory could be resolved
    #[error("unable to determine the user configuration directory")]
    ConfigDirUnavailable,

    /// A candidate file could not be opened or decoded during counting
    #[error("failed to read file '{path}': {source}")]
    UnreadableFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 1-based selection outside the displayed exclusion enumeration
    #[error("index {index} is out of range: pick a number between 1 and {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Writing the exclusion list back to disk failed
    #[error("failed to write exclusion list '{path}': {source}")]
    PersistFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The rewritten exclusion file still disagrees with the removal
    #[error("exclusion '{token}' is still present in '{path}' after removal")]
    RemovalNotPersisted { token: String, path: PathBuf },

    /// Origin path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
