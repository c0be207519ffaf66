//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No ROR IDs found in the text. Please check your input format.")]
    NoIdentifiersFound,

    #[error("Invalid ROR ID: {0}")]
    InvalidIdentifier(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl DomainError {
    /// Check if this error means the input held nothing usable
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::NoIdentifiersFound | DomainError::InvalidIdentifier(_)
        )
    }
}
