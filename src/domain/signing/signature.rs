//! Signature value and its textual encodings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{SignatureAlgorithm, SigningError};

/// Text encoding of a digest on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    #[default]
    Hex,
    Base64,
}

/// A computed MAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub algorithm: SignatureAlgorithm,
    pub encoding: SignatureEncoding,
    pub digest: Vec<u8>,
}

impl Signature {
    /// Renders the digest in this signature's encoding.
    pub fn encoded(&self) -> String {
        match self.encoding {
            SignatureEncoding::Hex => hex::encode(&self.digest),
            SignatureEncoding::Base64 => STANDARD.encode(&self.digest),
        }
    }

    /// Same digest, different wire encoding.
    pub fn with_encoding(mut self, encoding: SignatureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn to_encoded(&self) -> EncodedSignature {
        EncodedSignature {
            algorithm: self.algorithm,
            encoding: self.encoding,
            value: self.encoded(),
        }
    }

    /// Decodes a presented signature.
    ///
    /// # Errors
    ///
    /// `SigningError::MalformedSignature` when the text is not valid in the
    /// given encoding or the digest length does not match the algorithm.
    pub fn decode(candidate: &EncodedSignature) -> Result<Self, SigningError> {
        let value = candidate.value.trim();
        let digest = match candidate.encoding {
            SignatureEncoding::Hex => hex::decode(value)
                .map_err(|_| SigningError::MalformedSignature("invalid hex".to_string()))?,
            SignatureEncoding::Base64 => STANDARD
                .decode(value)
                .map_err(|_| SigningError::MalformedSignature("invalid base64".to_string()))?,
        };

        if digest.len() != candidate.algorithm.digest_len() {
            return Err(SigningError::MalformedSignature(format!(
                "expected {} digest bytes, got {}",
                candidate.algorithm.digest_len(),
                digest.len()
            )));
        }

        Ok(Self {
            algorithm: candidate.algorithm,
            encoding: candidate.encoding,
            digest,
        })
    }
}

/// A signature as it arrives from the outside: still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSignature {
    pub algorithm: SignatureAlgorithm,
    pub encoding: SignatureEncoding,
    pub value: String,
}

impl EncodedSignature {
    /// Hex-encoded candidate, the provider's default.
    pub fn hex(algorithm: SignatureAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            encoding: SignatureEncoding::Hex,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256_signature() -> Signature {
        Signature {
            algorithm: SignatureAlgorithm::HmacSha256,
            encoding: SignatureEncoding::Hex,
            digest: vec![0xab; 32],
        }
    }

    #[test]
    fn hex_encoding_is_lowercase() {
        assert_eq!(sha256_signature().encoded(), "ab".repeat(32));
    }

    #[test]
    fn decode_accepts_uppercase_hex() {
        let candidate = EncodedSignature::hex(SignatureAlgorithm::HmacSha256, "AB".repeat(32));

        let decoded = Signature::decode(&candidate).unwrap();

        assert_eq!(decoded, sha256_signature());
    }

    #[test]
    fn base64_encoding_decodes_back() {
        let sig = sha256_signature().with_encoding(SignatureEncoding::Base64);

        let decoded = Signature::decode(&sig.to_encoded()).unwrap();

        assert_eq!(decoded.digest, vec![0xab; 32]);
        assert_eq!(decoded.encoding, SignatureEncoding::Base64);
    }

    #[test]
    fn decode_rejects_invalid_hex() {
        let candidate = EncodedSignature::hex(SignatureAlgorithm::HmacSha256, "zz");
        assert!(matches!(
            Signature::decode(&candidate),
            Err(SigningError::MalformedSignature(_))
        ));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        // A sha256-sized digest presented as sha512.
        let candidate = EncodedSignature::hex(SignatureAlgorithm::HmacSha512, "ab".repeat(32));
        assert!(matches!(
            Signature::decode(&candidate),
            Err(SigningError::MalformedSignature(_))
        ));
    }
}
