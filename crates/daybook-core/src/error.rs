//! Error types for Daybook core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.
//!
//! Read-heavy operations (listing, search, todo scanning) deliberately do not
//! surface these errors: a partially corrupt notes directory must never stop a
//! listing. Those paths skip or default instead, and the skipped file is
//! logged. The error type serves the write paths and any caller that wants to
//! know which file failed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using DaybookError
pub type Result<T> = std::result::Result<T, DaybookError>;

/// Core error types for Daybook operations.
#[derive(Error, Debug)]
pub enum DaybookError {
    // === Note Store Errors ===
    /// The note file is missing or could not be found
    #[error("note not found at {path}")]
    NoteNotFound { path: PathBuf },

    // === Todo Errors ===
    /// The todo line changed (or vanished) between scan and completion
    #[error("todo at {path}:{line} no longer matches the scanned line")]
    StaleTodo { path: PathBuf, line: usize },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DaybookError {
    /// Returns true if retrying the same call could succeed without a fresh
    /// scan or listing (transient I/O only; a stale todo never qualifies).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DaybookError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_recoverable() {
        let err = DaybookError::Io(std::io::Error::other("disk"));
        assert!(err.is_recoverable());

        let err = DaybookError::StaleTodo {
            path: PathBuf::from("/notes/a.md"),
            line: 5,
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_display_carries_path() {
        let err = DaybookError::StaleTodo {
            path: PathBuf::from("/notes/groceries.md"),
            line: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("groceries.md"));
        assert!(msg.contains("12"));
    }
}
