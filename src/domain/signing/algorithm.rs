//! Signature algorithms accepted by the provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SigningError;

/// HMAC variants the provider understands, named on the wire as
/// `checkout-algorithm: sha256 | sha512`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SignatureAlgorithm {
    #[serde(rename = "sha256")]
    HmacSha256,
    #[default]
    #[serde(rename = "sha512")]
    HmacSha512,
}

impl SignatureAlgorithm {
    /// Wire name used in the `checkout-algorithm` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::HmacSha256 => "sha256",
            SignatureAlgorithm::HmacSha512 => "sha512",
        }
    }

    /// Length of the raw MAC in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            SignatureAlgorithm::HmacSha256 => 32,
            SignatureAlgorithm::HmacSha512 => 64,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "hmac-sha256" => Ok(SignatureAlgorithm::HmacSha256),
            "sha512" | "hmac-sha512" => Ok(SignatureAlgorithm::HmacSha512),
            other => Err(SigningError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}
