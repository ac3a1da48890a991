//! HTTP transport for the provider API.
//!
//! Implements `PaymentTransport` with `reqwest`. The request is sent exactly
//! as signed; nothing here adds or rewrites `checkout-*` headers.

use async_trait::async_trait;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use std::time::Duration;

use crate::domain::payment::{SignedRequest, REQUEST_ID_HEADER};
use crate::ports::{PaymentTransport, RawResponse, TransportError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpPaymentTransport {
    http_client: reqwest::Client,
}

impl HttpPaymentTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { http_client })
    }

    /// Uses a preconfigured client (proxies, custom TLS roots).
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl PaymentTransport for HttpPaymentTransport {
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let mut builder = self.http_client.request(method, request.url.as_str());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name.as_str(), value.as_bytes());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let headers = convert_headers(response.headers());
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::warn!(
                status = status.as_u16(),
                request_id = request_id.as_deref().unwrap_or("-"),
                "Provider returned error status"
            );
            return Err(TransportError::Provider {
                status: status.as_u16(),
                body,
                request_id,
            });
        }

        tracing::debug!(
            status = status.as_u16(),
            request_id = request_id.as_deref().unwrap_or("-"),
            "Provider response received"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

/// Copies headers across `http` crate versions; unrepresentable ones are dropped.
fn convert_headers(source: &reqwest::header::HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(source.len());
    for (name, value) in source.iter() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }
    headers
}
