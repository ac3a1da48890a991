//! Callback rejection reasons.
//!
//! Every rejection maps to the same opaque HTTP response so that a prober
//! cannot tell which check failed. The distinct variants exist for logs and
//! for the integrating application.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Message returned to the provider for any rejected callback.
pub const REJECTED_CALLBACK_MESSAGE: &str = "callback rejected";

/// Reasons a callback is refused before it reaches the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackRejection {
    /// No `signature` field was present.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature did not verify against the merchant secret.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Timestamp is missing or outside the freshness window.
    #[error("Stale callback")]
    StaleCallback,

    /// Merchant reference is missing or malformed.
    #[error("Unknown reference")]
    UnknownReference,

    /// A required signed field is missing or unparseable.
    #[error("Malformed callback field: {0}")]
    MalformedCallback(&'static str),
}

impl CallbackRejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            CallbackRejection::MissingSignature => ErrorCode::MissingSignature,
            CallbackRejection::SignatureMismatch => ErrorCode::SignatureMismatch,
            CallbackRejection::StaleCallback => ErrorCode::StaleCallback,
            CallbackRejection::UnknownReference => ErrorCode::UnknownReference,
            CallbackRejection::MalformedCallback(_) => ErrorCode::MalformedCallback,
        }
    }

    /// HTTP status the endpoint answers with. Identical for all variants.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Body the endpoint answers with. Identical for all variants.
    pub fn public_message(&self) -> &'static str {
        REJECTED_CALLBACK_MESSAGE
    }
}
