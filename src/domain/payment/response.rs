//! Signed provider responses.
//!
//! API responses carry `checkout-*` headers and a `signature` header
//! computed like a request signature. A body is trusted only after it
//! verifies.

use http::HeaderMap;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::signing::{
    canonicalize, check, EncodedSignature, MerchantCredential, SignableMessage,
    SignatureAlgorithm, SIGNATURE_FIELD,
};

use super::builder::HEADER_ALGORITHM;

/// Header carrying the provider's request id, useful when contacting support.
pub const REQUEST_ID_HEADER: &str = "cof-request-id";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseSignatureError {
    #[error("Response carries no signature")]
    Unsigned,

    #[error("Response signature does not verify")]
    Mismatch,
}

impl ResponseSignatureError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ResponseSignature
    }
}

/// Verifies provider responses for one merchant account.
#[derive(Debug, Clone)]
pub struct ResponseVerifier {
    credential: MerchantCredential,
}

impl ResponseVerifier {
    pub fn new(credential: MerchantCredential) -> Self {
        Self { credential }
    }

    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), ResponseSignatureError> {
        let signature = headers
            .get(SIGNATURE_FIELD)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ResponseSignatureError::Unsigned)?;

        let pairs = headers.iter().filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str(), v.to_string()))
        });
        let message = SignableMessage::from_signed_fields(pairs).with_body(body.to_vec());

        let algorithm = match message.get(HEADER_ALGORITHM) {
            Some(declared) => declared
                .parse::<SignatureAlgorithm>()
                .map_err(|_| ResponseSignatureError::Mismatch)?,
            None => self.credential.algorithm(),
        };

        let canonical = canonicalize(&message).map_err(|_| ResponseSignatureError::Mismatch)?;
        let candidate = EncodedSignature::hex(algorithm, signature);

        if check(&self.credential, &canonical, &candidate).is_valid() {
            Ok(())
        } else {
            tracing::warn!(
                code = %ErrorCode::ResponseSignature,
                request_id = request_id(headers).unwrap_or("-"),
                "Provider response signature mismatch"
            );
            Err(ResponseSignatureError::Mismatch)
        }
    }
}

/// Value of the `cof-request-id` header, if present.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signing::sign;
    use http::header::HeaderValue;

    fn credential() -> MerchantCredential {
        MerchantCredential::new("375917", "SAIPPUAKAUPPIAS", SignatureAlgorithm::HmacSha512)
    }

    fn signed_headers(body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("checkout-account", HeaderValue::from_static("375917"));
        headers.insert("checkout-algorithm", HeaderValue::from_static("sha512"));
        headers.insert("cof-request-id", HeaderValue::from_static("req-1"));

        let message = SignableMessage::from_signed_fields(
            headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_str().unwrap().to_string())),
        )
        .with_body(body.to_vec());
        let signature = sign(&credential(), &canonicalize(&message).unwrap()).unwrap();
        headers.insert(
            "signature",
            HeaderValue::from_str(&signature.encoded()).unwrap(),
        );
        headers
    }

    #[test]
    fn accepts_signed_response() {
        let body = br#"{"transactionId":"tx-1"}"#;
        let headers = signed_headers(body);

        assert!(ResponseVerifier::new(credential()).verify(&headers, body).is_ok());
        assert_eq!(request_id(&headers), Some("req-1"));
    }

    #[test]
    fn rejects_modified_body() {
        let headers = signed_headers(br#"{"transactionId":"tx-1"}"#);

        let err = ResponseVerifier::new(credential())
            .verify(&headers, br#"{"transactionId":"tx-2"}"#)
            .unwrap_err();

        assert_eq!(err, ResponseSignatureError::Mismatch);
        assert_eq!(err.code(), ErrorCode::ResponseSignature);
    }

    #[test]
    fn rejects_unsigned_response() {
        let err = ResponseVerifier::new(credential())
            .verify(&HeaderMap::new(), b"{}")
            .unwrap_err();
        assert_eq!(err, ResponseSignatureError::Unsigned);
    }
}
