//! Core error types.

use thiserror::Error;

/// Core query and dataset errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The query document has the wrong shape.
    #[error("invalid query structure: {0}")]
    Structural(String),

    /// The query is well-shaped but invalid for the resolved dataset.
    #[error("invalid query: {0}")]
    Semantic(String),

    /// A row-count ceiling was exceeded.
    #[error("result too large: {count} rows exceeds the limit of {limit}")]
    ResultTooLarge { count: usize, limit: usize },

    /// Dataset not found in the store.
    #[error("dataset not found: {0}")]
    NotFound(String),

    /// Dataset rejected by the store.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

/// Coarse error classification for boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Structural,
    Semantic,
    ResultTooLarge,
    NotFound,
    InvalidDataset,
}

impl Error {
    /// Create a structural error.
    pub fn structural(reason: impl Into<String>) -> Self {
        Error::Structural(reason.into())
    }

    /// Create a semantic error.
    pub fn semantic(reason: impl Into<String>) -> Self {
        Error::Semantic(reason.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structural(_) => ErrorKind::Structural,
            Error::Semantic(_) => ErrorKind::Semantic,
            Error::ResultTooLarge { .. } => ErrorKind::ResultTooLarge,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidDataset(_) => ErrorKind::InvalidDataset,
        }
    }

    /// Returns true if the query was rejected before evaluation started.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Structural | ErrorKind::Semantic)
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::structural("x").kind(), ErrorKind::Structural);
        assert_eq!(Error::semantic("x").kind(), ErrorKind::Semantic);
        assert_eq!(
            Error::ResultTooLarge {
                count: 5001,
                limit: 5000
            }
            .kind(),
            ErrorKind::ResultTooLarge
        );
        assert_eq!(Error::NotFound("a".into()).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_result_too_large_is_not_validation() {
        let err = Error::ResultTooLarge {
            count: 5001,
            limit: 5000,
        };
        assert!(!err.is_validation());
        assert!(Error::semantic("bad field").is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = Error::ResultTooLarge {
            count: 5001,
            limit: 5000,
        };
        let display = err.to_string();
        assert!(display.contains("5001"));
        assert!(display.contains("5000"));
    }
}
