//! Error types for claim envelope ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort ingestion of one envelope or file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Envelope Errors ===
    /// Required outer nesting path is absent.
    #[error("invalid envelope structure: missing {path}")]
    Structural { path: String },

    /// Text is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    MalformedXml { position: u64, message: String },

    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn malformed(position: u64, message: impl std::fmt::Display) -> Self {
        Self::MalformedXml {
            position,
            message: message.to_string(),
        }
    }

    /// True when the envelope content itself is unusable (as opposed to an
    /// I/O failure around it).
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. } | Self::MalformedXml { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Why a subfile payload was kept undecoded. Recovered internally and only
/// logged.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not Base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded payload is not markup")]
    NotMarkup,

    #[error("decoded payload is not XML: {0}")]
    Xml(#[source] IngestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Structural {
            path: "GIAMDINHHS.THONGTINHOSO.DANHSACHHOSO.HOSO".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid envelope structure: missing GIAMDINHHS.THONGTINHOSO.DANHSACHHOSO.HOSO"
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_io_errors_are_not_structural() {
        let err = IngestError::DirectoryNotFound {
            path: PathBuf::from("/missing"),
        };
        assert!(!err.is_structural());
    }
}
