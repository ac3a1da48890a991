//! Signed outbound request construction.
//!
//! Every request carries the `checkout-*` headers below, and a `signature`
//! header computed over those headers plus the body:
//!
//! | Header                    | Value                              |
//! |---------------------------|------------------------------------|
//! | `checkout-account`        | merchant account id                |
//! | `checkout-algorithm`      | `sha256` / `sha512`                |
//! | `checkout-method`         | HTTP method                        |
//! | `checkout-nonce`          | 256-bit random, URL-safe base64    |
//! | `checkout-timestamp`      | RFC 3339 UTC                       |
//! | `checkout-transaction-id` | only for per-transaction requests  |
//!
//! The builder performs no I/O; the transport port sends the result.

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use url::Url;

use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::signing::{
    canonicalize, generate_nonce, generate_stamp, sign, MerchantCredential, SignableMessage,
    Signature, SigningError, SIGNATURE_FIELD,
};

use super::RequestError;

/// Production API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.checkout.fi";

pub const HEADER_ACCOUNT: &str = "checkout-account";
pub const HEADER_ALGORITHM: &str = "checkout-algorithm";
pub const HEADER_METHOD: &str = "checkout-method";
pub const HEADER_NONCE: &str = "checkout-nonce";
pub const HEADER_TIMESTAMP: &str = "checkout-timestamp";
pub const HEADER_TRANSACTION_ID: &str = "checkout-transaction-id";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A request ready to hand to the transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub signature: Signature,
}

impl SignedRequest {
    /// Returns a header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn nonce(&self) -> Option<&str> {
        self.header(HEADER_NONCE)
    }
}

/// Caller-supplied values that are otherwise generated.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub nonce: Option<String>,
    pub timestamp: Option<Timestamp>,
}

/// Builds signed requests for one merchant account.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credential: MerchantCredential,
    endpoint: Url,
}

impl RequestBuilder {
    /// Creates a builder for the given credential and API base URL.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the endpoint is not an absolute http(s) URL.
    pub fn new(credential: MerchantCredential, endpoint: &str) -> Result<Self, RequestError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ValidationError::invalid_format("api_endpoint", e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ValidationError::invalid_format("api_endpoint", "must be http(s)").into());
        }
        Ok(Self {
            credential,
            endpoint,
        })
    }

    pub fn credential(&self) -> &MerchantCredential {
        &self.credential
    }

    /// `POST /payments` with a fresh nonce, timestamp and (if absent) stamp.
    pub fn create_payment(
        &self,
        request: &super::PaymentRequest,
    ) -> Result<SignedRequest, RequestError> {
        self.create_payment_with(request, RequestContext::default())
    }

    /// `POST /payments` using caller-supplied nonce/timestamp where given.
    pub fn create_payment_with(
        &self,
        request: &super::PaymentRequest,
        context: RequestContext,
    ) -> Result<SignedRequest, RequestError> {
        request.validate()?;

        let mut request = request.clone();
        if request.stamp.is_none() {
            request.stamp = Some(generate_stamp());
        }
        let body = serde_json::to_vec(&request)?;

        self.sign_request(Method::POST, "/payments", None, Some(body), context)
    }

    /// `GET /payments/{transaction_id}`.
    pub fn payment_status(&self, transaction_id: &str) -> Result<SignedRequest, RequestError> {
        self.payment_status_with(transaction_id, RequestContext::default())
    }

    pub fn payment_status_with(
        &self,
        transaction_id: &str,
        context: RequestContext,
    ) -> Result<SignedRequest, RequestError> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(ValidationError::empty_field("transaction_id").into());
        }
        if !transaction_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(
                ValidationError::invalid_format("transaction_id", "unexpected character").into(),
            );
        }

        let path = format!("/payments/{}", transaction_id);
        self.sign_request(Method::GET, &path, Some(transaction_id), None, context)
    }

    /// `GET /merchants/payment-providers[?amount=N]`.
    pub fn list_providers(&self, amount: Option<i64>) -> Result<SignedRequest, RequestError> {
        self.list_providers_with(amount, RequestContext::default())
    }

    pub fn list_providers_with(
        &self,
        amount: Option<i64>,
        context: RequestContext,
    ) -> Result<SignedRequest, RequestError> {
        if let Some(amount) = amount {
            if amount <= 0 {
                return Err(
                    ValidationError::invalid_format("amount", "must be positive").into(),
                );
            }
        }
        let mut request =
            self.sign_request(Method::GET, "/merchants/payment-providers", None, None, context)?;
        if let Some(amount) = amount {
            request
                .url
                .query_pairs_mut()
                .append_pair("amount", &amount.to_string());
        }
        Ok(request)
    }

    fn sign_request(
        &self,
        method: Method,
        path: &str,
        transaction_id: Option<&str>,
        body: Option<Vec<u8>>,
        context: RequestContext,
    ) -> Result<SignedRequest, RequestError> {
        let nonce = context.nonce.unwrap_or_else(generate_nonce);
        if nonce.trim().is_empty() {
            return Err(ValidationError::empty_field(HEADER_NONCE).into());
        }
        let timestamp = context.timestamp.unwrap_or_else(Timestamp::now);

        let mut message = SignableMessage::new();
        message.insert(HEADER_ACCOUNT, self.credential.account_id());
        message.insert(HEADER_ALGORITHM, self.credential.algorithm().as_str());
        message.insert(HEADER_METHOD, method.as_str());
        message.insert(HEADER_NONCE, nonce);
        message.insert(HEADER_TIMESTAMP, timestamp.to_rfc3339());
        if let Some(id) = transaction_id {
            message.insert(HEADER_TRANSACTION_ID, id);
        }
        if let Some(body) = &body {
            message = message.with_body(body.clone());
        }

        let canonical = canonicalize(&message)?;
        let signature = sign(&self.credential, &canonical)?;

        let mut headers = HeaderMap::new();
        for (name, value) in message.fields() {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        headers.insert(
            header_name(SIGNATURE_FIELD)?,
            header_value(SIGNATURE_FIELD, &signature.encoded())?,
        );

        let url = self
            .endpoint
            .join(path)
            .map_err(|e| ValidationError::invalid_format("path", e.to_string()))?;

        tracing::debug!(
            method = %method,
            url = %url,
            account_id = %self.credential.account_id(),
            "Signed outbound request"
        );

        Ok(SignedRequest {
            method,
            url,
            headers,
            body,
            signature,
        })
    }
}

fn header_name(name: &str) -> Result<HeaderName, SigningError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| SigningError::EncodingError {
            field: name.to_string(),
            reason: "invalid header name".to_string(),
        })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, SigningError> {
    HeaderValue::from_str(value).map_err(|_| SigningError::EncodingError {
        field: name.to_string(),
        reason: "value is not a valid header value".to_string(),
    })
}
