//! Storage error types for the recipe storage abstraction layer.

use std::fmt;

/// Errors that can occur during storage operations.
///
/// Absence of a record is not an error: lookups return `Option` and
/// mutations return affected-row counts. These variants cover backend
/// failures only.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The storage backend could not be reached or the query failed.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of the connectivity or query failure.
        message: String,
    },

    /// The record data is invalid.
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// Description of why the record is invalid.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRecord` error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a backend availability error.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unavailable { .. } => ErrorCategory::Infrastructure,
            Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Infrastructure/connection error.
    Infrastructure,
    /// Validation error.
    Validation,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Validation => write!(f, "validation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Store unavailable: connection refused");

        let err = StorageError::invalid_record("missing title");
        assert_eq!(err.to_string(), "Invalid record: missing title");
    }

    #[test]
    fn test_error_predicates() {
        assert!(StorageError::unavailable("x").is_unavailable());
        assert!(!StorageError::internal("x").is_unavailable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::unavailable("x").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            StorageError::invalid_record("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::internal("x").category(),
            ErrorCategory::Internal
        );
    }
}
