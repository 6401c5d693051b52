//! Error types for Herbarium.
//!
//! Library crates use [`HerbariumError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Herbarium operations.
#[derive(Debug, thiserror::Error)]
pub enum HerbariumError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed input data (JSON artifacts, JSONL lines).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid parameters or broken data invariants.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Failure while encoding an artifact.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HerbariumError>;

impl HerbariumError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = HerbariumError::config("overlap must be below max_words");
        assert_eq!(err.to_string(), "config error: overlap must be below max_words");

        let err = HerbariumError::parse("line 3: expected value");
        assert!(err.to_string().starts_with("parse error"));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn io_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = HerbariumError::io("/tmp/herbal.txt", source);
        let msg = err.to_string();
        assert!(msg.contains("herbal.txt"));
        assert!(msg.contains("no such file"));
    }
}
