//! Error types for textscout.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`SearchError`] is terminal. An invalid root, a pattern that does not
//!   compile, unusable configuration or a report that cannot be written all
//!   stop the run.
//! - [`LoadError`] describes why a single file could not be read. It is
//!   folded into the report as an error record and the run carries on.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that abort a search run
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("The specified path '{}' is not a valid directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid exclude pattern: {0}")]
    InvalidExcludePattern(String),
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Why a single file could not be loaded.
///
/// The `Display` text is the reason stored in the report.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Failed to decode with available encodings")]
    Undecodable,
    #[error("Error reading file: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => LoadError::PermissionDenied,
            _ => LoadError::Io(err),
        }
    }
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl SearchError {
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory(path.into())
    }

    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern(message.into())
    }

    pub fn invalid_exclude_pattern(message: impl Into<String>) -> Self {
        Self::InvalidExcludePattern(message.into())
    }

    pub fn unknown_encoding(label: impl Into<String>) -> Self {
        Self::UnknownEncoding(label.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn report_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source,
        }
    }
}
