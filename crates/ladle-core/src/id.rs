//! Recipe identifier generation and validation.
//!
//! Identifiers are opaque UUID v4 strings assigned by the store on insert
//! and never reused after deletion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("Invalid recipe ID format: {0}")]
    Invalid(String),
}

/// Generate a fresh recipe identifier.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validate that `id` is a well-formed recipe identifier.
///
/// Callers that look records up by id treat a malformed id the same as an
/// unknown one, so this is a format check only.
pub fn validate_id(id: &str) -> Result<(), IdError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| IdError::Invalid(id.to_string()))
}
