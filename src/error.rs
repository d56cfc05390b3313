//! Error types for sbom-score.
//!
//! Configuration and catalog errors abort a run. Document errors are
//! recovered per input and only surface when every input failed.

use crate::catalog::CatalogError;
use crate::config::ConfigFileError;
use crate::parsers::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scoring runs.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScoreError {
    /// Invalid selection or run configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The rule catalog failed its construction checks
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The scoring config file could not be loaded
    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    /// One input document could not be loaded
    #[error("Failed to load {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: DocumentError,
    },

    /// Every input failed
    #[error("No documents could be scored ({attempted} attempted)")]
    NoDocumentsScored { attempted: usize },

    /// Cancellation was requested or the deadline passed
    #[error("Scoring was cancelled")]
    Cancelled,
}

impl ScoreError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap a per-document error with the path it came from
    pub fn document(path: impl Into<String>, source: DocumentError) -> Self {
        match source {
            DocumentError::Cancelled => Self::Cancelled,
            source => Self::Document {
                path: path.into(),
                source,
            },
        }
    }
}

/// Failure to turn one input into a scorable document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Directory traversal failed: {0}")]
    Traversal(String),

    #[error("Unsupported input: {0}")]
    Unsupported(String),

    #[error("Signature bundle unreadable: {0}")]
    Signature(String),

    #[error("Cancelled")]
    Cancelled,
}

impl DocumentError {
    /// Create an IO error with the offending path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_cancel_maps_to_cancelled() {
        let err = ScoreError::document("a.json", DocumentError::Cancelled);
        assert!(matches!(err, ScoreError::Cancelled));
    }

    #[test]
    fn test_error_display() {
        let err = ScoreError::document("sbom.json", DocumentError::NotFound("sbom.json".into()));
        assert_eq!(
            err.to_string(),
            "Failed to load sbom.json: Path not found: sbom.json"
        );
        let err = ScoreError::NoDocumentsScored { attempted: 3 };
        assert!(err.to_string().contains("3 attempted"));
    }
}
