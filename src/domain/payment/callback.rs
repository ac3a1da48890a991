//! Inbound callback shapes.
//!
//! The provider reports outcomes two ways: a browser redirect carrying the
//! `checkout-*` fields as query parameters, and a server-to-server request
//! carrying them as headers. Both are forwarded here unmodified.

use http::HeaderMap;

use crate::domain::foundation::Timestamp;
use crate::domain::signing::{SignableMessage, Signature};

use super::PaymentStatus;

/// Callback exactly as received by the integrating application's endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCallback {
    /// Browser redirect to a success/cancel URL.
    Redirect { query: Vec<(String, String)> },

    /// Server-to-server notification.
    Webhook {
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },
}

impl RawCallback {
    /// Parses a raw (still percent-encoded) query string.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        RawCallback::Redirect { query: pairs }
    }

    /// Wraps already-decoded query pairs.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RawCallback::Redirect {
            query: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Wraps a webhook. Header values that are not visible ASCII are dropped;
    /// if a signed field is among them the signature will not verify.
    pub fn from_webhook(headers: &HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        let headers = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        RawCallback::Webhook {
            headers,
            body: body.into(),
        }
    }

    /// Splits into name/value pairs and an optional body.
    pub fn into_parts(self) -> (Vec<(String, String)>, Option<Vec<u8>>) {
        match self {
            RawCallback::Redirect { query } => (query, None),
            RawCallback::Webhook { headers, body } if body.is_empty() => (headers, None),
            RawCallback::Webhook { headers, body } => (headers, Some(body)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawCallback::Redirect { .. } => "redirect",
            RawCallback::Webhook { .. } => "webhook",
        }
    }
}

/// A callback whose signature and freshness have been verified.
///
/// Transient: built per inbound callback and folded into a
/// [`PaymentRecord`](super::PaymentRecord) by [`apply`](super::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    pub merchant_reference: String,
    pub provider_transaction_id: String,
    pub reported_status: PaymentStatus,
    /// `checkout-status` as sent, before normalization.
    pub raw_status: String,
    pub signature: Signature,
    pub timestamp: Timestamp,
    pub nonce: Option<String>,
    pub stamp: Option<String>,
    /// Amount in minor units, when reported.
    pub amount: Option<i64>,
    pub provider: Option<String>,
    /// Every signed field, for audit.
    pub fields: SignableMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    #[test]
    fn query_string_is_percent_decoded() {
        let raw = RawCallback::from_query_string(
            "?checkout-reference=order%2042&checkout-status=ok&signature=ab",
        );

        let (pairs, body) = raw.into_parts();

        assert!(body.is_none());
        assert_eq!(
            pairs[0],
            ("checkout-reference".to_string(), "order 42".to_string())
        );
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn plus_decodes_to_space() {
        let raw = RawCallback::from_query_string("checkout-provider=nordea+bank");
        let (pairs, _) = raw.into_parts();
        assert_eq!(pairs[0].1, "nordea bank");
    }

    #[test]
    fn webhook_keeps_headers_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert("checkout-status", HeaderValue::from_static("ok"));
        headers.insert("signature", HeaderValue::from_static("abcd"));

        let raw = RawCallback::from_webhook(&headers, b"{}".to_vec());
        assert_eq!(raw.kind(), "webhook");

        let (pairs, body) = raw.into_parts();
        assert_eq!(pairs.len(), 2);
        assert_eq!(body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn webhook_with_empty_body_has_no_body() {
        let raw = RawCallback::from_webhook(&HeaderMap::new(), Vec::new());
        let (_, body) = raw.into_parts();
        assert!(body.is_none());
    }
}
