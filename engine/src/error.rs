//! Error types for the trust engine
//!
//! Scoring itself is infallible. Errors only surface at the boundary:
//! - `DomainError::Validation`: structurally invalid events, histories or configs
//! - `DomainError::Serialization`: JSON encode/decode failures in the helpers

use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
