//! Payment transport port.
//!
//! Sends a `SignedRequest` to the provider and hands back the raw response.
//! Retry policy, if any, lives in the implementation.

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::payment::{request_id, SignedRequest};

/// Response as received from the provider, before any verification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Provider request id (`cof-request-id`), if sent.
    pub fn request_id(&self) -> Option<&str> {
        request_id(&self.headers)
    }
}

/// Errors returned by transport implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS or TLS failure.
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Provider answered with a non-success status.
    #[error("Provider returned {status}: {body}")]
    Provider {
        status: u16,
        body: String,
        request_id: Option<String>,
    },
}

impl TransportError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::TransportError
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network(_) | TransportError::Timeout => true,
            TransportError::Provider { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Port for sending signed requests to the provider.
#[async_trait]
pub trait PaymentTransport: Send + Sync {
    /// Send the request.
    ///
    /// # Errors
    ///
    /// - `Network` / `Timeout` when no response was received
    /// - `Provider` for any non-2xx status
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, TransportError>;
}
