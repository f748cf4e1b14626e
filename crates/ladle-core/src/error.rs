use thiserror::Error;

/// Core error types for Ladle domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid recipe ID: {0}")]
    InvalidId(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),
}

impl CoreError {
    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(timestamp: impl Into<String>) -> Self {
        Self::InvalidTimestamp(timestamp.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_) | Self::InvalidTimestamp(_) | Self::JsonError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
