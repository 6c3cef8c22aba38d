//! Error types for the media auditor

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error kinds that can occur while auditing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditErrorKind {
    /// Invalid run configuration (fatal, reported before any traversal)
    Configuration,
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// I/O error during file operations
    IoError,
    /// Subtitle content could not be parsed
    Parse,
    /// Entry name is not valid UTF-8
    InvalidPath,
    /// Worker pool or other runtime setup failed
    Runtime,
}

/// Represents an error that occurred during an audit
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct AuditError {
    /// The kind of error
    pub kind: AuditErrorKind,
    /// The path where the error occurred
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl AuditError {
    /// Create a new audit error
    pub fn new(kind: AuditErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AuditErrorKind::Configuration, None, message)
    }

    /// Create a configuration error tied to a path
    pub fn configuration_at(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(AuditErrorKind::Configuration, Some(path), message)
    }

    /// Create a not found error
    pub fn not_found(path: PathBuf) -> Self {
        Self::new(
            AuditErrorKind::NotFound,
            Some(path.clone()),
            format!("Not found: {:?}", path),
        )
    }

    /// Create an I/O error
    pub fn io_error(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(AuditErrorKind::IoError, path, message)
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(AuditErrorKind::Runtime, None, message)
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            AuditErrorKind::Configuration | AuditErrorKind::Runtime
        )
    }
}

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => AuditErrorKind::PermissionDenied,
            std::io::ErrorKind::NotFound => AuditErrorKind::NotFound,
            _ => AuditErrorKind::IoError,
        };
        Self::new(kind, None, err.to_string())
    }
}

impl From<walkdir::Error> for AuditError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let kind = if err.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied)
        {
            AuditErrorKind::PermissionDenied
        } else {
            AuditErrorKind::IoError
        };
        Self::new(kind, path, err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::configuration(err.to_string())
    }
}

/// A phonetic key could not be computed for a name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The name contains no letter or digit to anchor the key
    #[error("no encodable characters in {0:?}")]
    Uncodeable(String),
    /// A key of length zero was requested
    #[error("phonetic key length must be greater than zero")]
    ZeroLength,
}

/// Why a language detection produced no answer
///
/// Returned as data so callers fold it into counters instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum DetectionFailure {
    /// The file could not be read
    #[error("read failed: {0}")]
    Read(String),
    /// The file content is not valid in the expected encoding
    #[error("decode failed: {0}")]
    Decode(String),
    /// The subtitle could not be parsed into cues
    #[error("parse failed: {0}")]
    Parse(String),
    /// Nothing left to analyse after skipping the first cue and stripping markup
    #[error("no text to analyse")]
    EmptyCorpus,
    /// The detector could not decide on a language
    #[error("language could not be determined")]
    Indeterminate,
}

impl DetectionFailure {
    /// Classify an I/O error from reading a file as UTF-8
    pub fn from_utf8_read(err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::InvalidData {
            DetectionFailure::Decode(err.to_string())
        } else {
            DetectionFailure::Read(err.to_string())
        }
    }

    /// Whether the detector itself gave up, as opposed to an I/O or parse problem
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, DetectionFailure::Indeterminate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kind_mapping() {
        let err: AuditError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind, AuditErrorKind::NotFound);

        let err: AuditError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(err.kind, AuditErrorKind::PermissionDenied);
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(AuditError::configuration("bad mode").is_fatal());
        assert!(AuditError::runtime("pool").is_fatal());
        assert!(!AuditError::not_found(PathBuf::from("/x")).is_fatal());
    }

    #[test]
    fn test_utf8_read_failure_is_decode() {
        let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        assert!(matches!(
            DetectionFailure::from_utf8_read(&err),
            DetectionFailure::Decode(_)
        ));

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(
            DetectionFailure::from_utf8_read(&err),
            DetectionFailure::Read(_)
        ));
    }

    #[test]
    fn test_detection_failure_serialization() {
        let json = serde_json::to_value(DetectionFailure::Indeterminate).unwrap();
        assert_eq!(json["reason"], "indeterminate");

        let json = serde_json::to_value(DetectionFailure::Parse("bad".into())).unwrap();
        assert_eq!(json["reason"], "parse");
        assert_eq!(json["message"], "bad");
    }
}
