//! Signing error types.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Errors raised while canonicalizing or signing a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// A field name or value cannot be carried by the provider's transport.
    #[error("Encoding error in field '{field}': {reason}")]
    EncodingError { field: String, reason: String },

    /// The algorithm name is not one the provider supports.
    #[error("Unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A presented signature could not be decoded.
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// The MAC implementation rejected the key.
    #[error("Invalid signing key")]
    InvalidKey,
}

impl SigningError {
    pub(crate) fn encoding(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SigningError::EncodingError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Diagnostic code for logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            SigningError::EncodingError { .. } => ErrorCode::EncodingError,
            SigningError::UnsupportedAlgorithm(_) => ErrorCode::UnsupportedAlgorithm,
            SigningError::MalformedSignature(_) => ErrorCode::MalformedSignature,
            SigningError::InvalidKey => ErrorCode::InternalError,
        }
    }
}
