//! Error types for keepsake

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for keepsake
#[derive(Error, Debug)]
pub enum KeepsakeError {
    // ============ Storage Errors ============
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot not found at {0}")]
    MissingSnapshot(PathBuf),

    // ============ Serialization Errors ============
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode state: {0}")]
    Encode(String),

    #[error("Timestamp outside the exactly encodable range: {0}")]
    InvalidTimestamp(String),

    // ============ Migration Errors ============
    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Migration registered for version {from_version} does not produce {expected}")]
    MigrationTypeMismatch {
        from_version: String,
        expected: &'static str,
    },

    // ============ Configuration Errors ============
    #[error("Invalid state identifier: {0}")]
    InvalidStateId(String),

    #[error("Invalid schema version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeepsakeError {
    /// Wrap an I/O error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeepsakeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a decode failure with the path of the offending file
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        KeepsakeError::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True when the error means "nothing on disk" rather than a real failure
    pub fn is_not_found(&self) -> bool {
        match self {
            KeepsakeError::MissingSnapshot(_) => true,
            KeepsakeError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for KeepsakeError {
    fn from(err: serde_json::Error) -> Self {
        KeepsakeError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = KeepsakeError::io(
            "/nowhere",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(missing.is_not_found());
        assert!(KeepsakeError::MissingSnapshot("/x".into()).is_not_found());

        let denied = KeepsakeError::io(
            "/root",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(!denied.is_not_found());
        assert!(!KeepsakeError::Encode("bad".into()).is_not_found());
    }

    #[test]
    fn test_display_includes_path() {
        let err = KeepsakeError::decode("/data/AppState/1/AppState.json", "expected value");
        let text = err.to_string();
        assert!(text.contains("/data/AppState/1/AppState.json"));
        assert!(text.contains("expected value"));
    }
}
