//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Diagnostic codes, emitted in logs and carried by errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request errors
    InvalidRequest,
    EncodingError,
    UnsupportedAlgorithm,

    // Signature diagnostics
    MalformedSignature,
    SignatureMismatch,
    ResponseSignature,

    // Callback rejections
    MissingSignature,
    StaleCallback,
    UnknownReference,
    MalformedCallback,

    // Transition outcomes
    StaleTransition,
    UnknownPayment,
    InvalidStateTransition,
    TransactionMismatch,
    FieldMismatch,

    // Infrastructure errors
    StorageError,
    TransportError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::EncodingError => "ENCODING_ERROR",
            ErrorCode::UnsupportedAlgorithm => "UNSUPPORTED_ALGORITHM",
            ErrorCode::MalformedSignature => "MALFORMED_SIGNATURE",
            ErrorCode::SignatureMismatch => "SIGNATURE_MISMATCH",
            ErrorCode::ResponseSignature => "RESPONSE_SIGNATURE",
            ErrorCode::MissingSignature => "MISSING_SIGNATURE",
            ErrorCode::StaleCallback => "STALE_CALLBACK",
            ErrorCode::UnknownReference => "UNKNOWN_REFERENCE",
            ErrorCode::MalformedCallback => "MALFORMED_CALLBACK",
            ErrorCode::StaleTransition => "STALE_TRANSITION",
            ErrorCode::UnknownPayment => "UNKNOWN_PAYMENT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::TransactionMismatch => "TRANSACTION_MISMATCH",
            ErrorCode::FieldMismatch => "FIELD_MISMATCH",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::TransportError => "TRANSPORT_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Used by port implementations (stores) to report infrastructure failures.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("reference");
        assert_eq!(format!("{}", err), "Field 'reference' cannot be empty");
    }

    #[test]
    fn validation_error_too_long_displays_correctly() {
        let err = ValidationError::too_long("stamp", 200, 201);
        assert_eq!(
            format!("{}", err),
            "Field 'stamp' must be at most 200 characters, got 201"
        );
    }

    #[test]
    fn validation_error_exposes_field() {
        let err = ValidationError::invalid_format("currency", "expected ISO 4217 code");
        assert_eq!(err.field(), "currency");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::storage("connection lost");
        assert_eq!(format!("{}", err), "[STORAGE_ERROR] connection lost");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::UnknownPayment, "no record")
            .with_detail("merchant_reference", "order-42");

        assert_eq!(
            err.details.get("merchant_reference"),
            Some(&"order-42".to_string())
        );
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::MalformedSignature), "MALFORMED_SIGNATURE");
        assert_eq!(format!("{}", ErrorCode::StaleTransition), "STALE_TRANSITION");
    }
}
