//! Payment handler errors.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::{
    CallbackRejection, RequestError, ResponseSignatureError, TransitionError,
    REJECTED_CALLBACK_MESSAGE,
};
use crate::ports::TransportError;

/// Errors from `CreatePaymentHandler`.
#[derive(Debug, Error)]
pub enum CreatePaymentError {
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A payment with this merchant reference already exists.
    #[error("Duplicate merchant reference: {0}")]
    DuplicateReference(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    ResponseSignature(#[from] ResponseSignatureError),

    /// Signed response body did not have the expected shape.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl CreatePaymentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CreatePaymentError::Request(e) => e.code(),
            CreatePaymentError::DuplicateReference(_) => ErrorCode::InvalidRequest,
            CreatePaymentError::Transport(e) => e.code(),
            CreatePaymentError::ResponseSignature(e) => e.code(),
            CreatePaymentError::InvalidResponse(_) => ErrorCode::TransportError,
            CreatePaymentError::Storage(e) => e.code,
        }
    }
}

/// Errors from `HandleCallbackHandler`.
#[derive(Debug, Error)]
pub enum CallbackHandlingError {
    /// Callback failed verification. Answered with an opaque 400.
    #[error(transparent)]
    Rejected(#[from] CallbackRejection),

    /// Verified callback could not be applied.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl CallbackHandlingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CallbackHandlingError::Rejected(e) => e.code(),
            CallbackHandlingError::Transition(e) => e.code(),
            CallbackHandlingError::Storage(e) => e.code,
        }
    }

    /// Status the callback endpoint should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CallbackHandlingError::Rejected(e) => e.status_code(),
            CallbackHandlingError::Transition(TransitionError::UnknownPayment { .. }) => {
                StatusCode::NOT_FOUND
            }
            CallbackHandlingError::Transition(_) => StatusCode::CONFLICT,
            CallbackHandlingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body the callback endpoint should answer with.
    pub fn public_message(&self) -> &'static str {
        match self {
            CallbackHandlingError::Rejected(_) => REJECTED_CALLBACK_MESSAGE,
            CallbackHandlingError::Transition(TransitionError::UnknownPayment { .. }) => {
                "unknown payment"
            }
            CallbackHandlingError::Transition(_) => "callback not applicable",
            CallbackHandlingError::Storage(_) => "internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_stay_opaque() {
        let forged = CallbackHandlingError::from(CallbackRejection::SignatureMismatch);
        let stale = CallbackHandlingError::from(CallbackRejection::StaleCallback);

        assert_eq!(forged.status_code(), stale.status_code());
        assert_eq!(forged.public_message(), stale.public_message());
        assert_ne!(forged.code(), stale.code());
    }

    #[test]
    fn unknown_payment_is_not_found() {
        let err = CallbackHandlingError::from(TransitionError::UnknownPayment {
            merchant_reference: "order-9".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::UnknownPayment);
    }

    #[test]
    fn storage_failure_is_internal() {
        let err = CallbackHandlingError::from(DomainError::storage("disk full"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
