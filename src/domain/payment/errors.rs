//! Payment domain errors.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::signing::SigningError;

use super::PaymentStatus;

/// Errors raised while building an outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Caller input violates a request invariant. Never retried.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// Canonicalization or signing failed.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialization(String),
}

impl RequestError {
    /// Name of the offending field for `InvalidRequest`.
    pub fn field(&self) -> Option<&str> {
        match self {
            RequestError::InvalidRequest(e) => Some(e.field()),
            RequestError::Signing(SigningError::EncodingError { field, .. }) => Some(field),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RequestError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            RequestError::Signing(e) => e.code(),
            RequestError::Serialization(_) => ErrorCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Serialization(err.to_string())
    }
}

/// Errors raised when an event cannot be folded into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// No local record exists for the event's reference.
    #[error("Unknown payment: {merchant_reference}")]
    UnknownPayment { merchant_reference: String },

    /// The record is bound to a different provider transaction.
    #[error("Transaction mismatch for payment {merchant_reference}")]
    TransactionMismatch { merchant_reference: String },

    /// The reported status is more final but not reachable from the current one.
    #[error("Invalid state transition: cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

impl TransitionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TransitionError::UnknownPayment { .. } => ErrorCode::UnknownPayment,
            TransitionError::TransactionMismatch { .. } => ErrorCode::TransactionMismatch,
            TransitionError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
        }
    }
}
