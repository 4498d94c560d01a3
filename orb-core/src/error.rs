// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for Orbital Files

use thiserror::Error;

/// Result type alias
pub type OrbResult<T> = Result<T, OrbError>;

/// Main error type
#[derive(Error, Debug)]
pub enum OrbError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}

impl OrbError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrbError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OrbError::NotFound(_) | OrbError::ProviderNotFound(_))
    }
}

impl From<serde_json::Error> for OrbError {
    fn from(err: serde_json::Error) -> Self {
        OrbError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(OrbError::Network("connection reset".into()).is_retryable());

        assert!(!OrbError::NotFound("file.txt".into()).is_retryable());
        assert!(!OrbError::InvalidRecord("empty name".into()).is_retryable());
        assert!(!OrbError::Unsupported("s3 backend".into()).is_retryable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(OrbError::NotFound("a".into()).is_not_found());
        assert!(OrbError::ProviderNotFound("s3.S3".into()).is_not_found());
        assert!(!OrbError::Network("reset".into()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = OrbError::NotFound("docs/notes.txt".into());
        assert_eq!(format!("{}", err), "Path not found: docs/notes.txt");

        let err = OrbError::ProviderNotFound("work".into());
        assert_eq!(err.to_string(), "Provider not found: work");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let orb_err: OrbError = io_err.into();
        assert!(matches!(orb_err, OrbError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let orb_err: OrbError = json_err.into();
        assert!(matches!(orb_err, OrbError::Serialization(_)));
    }
}
