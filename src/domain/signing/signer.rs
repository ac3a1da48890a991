//! HMAC signing and verification.
//!
//! Signing is deterministic: the same credential and canonical bytes always
//! give the same digest. Verification recomputes the digest and compares it
//! with `subtle::ConstantTimeEq`, so timing does not reveal how many leading
//! bytes matched.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::domain::foundation::ErrorCode;

use super::{EncodedSignature, MerchantCredential, Signature, SignatureAlgorithm, SignatureEncoding, SigningError};

/// Outcome of a detailed signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid,
    /// Well-formed signature that does not match.
    Mismatch,
    /// Candidate could not be decoded (logged as `MALFORMED_SIGNATURE`).
    Malformed,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid)
    }
}

/// Signs canonical bytes with the credential's own algorithm.
pub fn sign(credential: &MerchantCredential, canonical: &[u8]) -> Result<Signature, SigningError> {
    sign_with(credential, credential.algorithm(), canonical)
}

/// Signs canonical bytes with an explicit algorithm.
pub fn sign_with(
    credential: &MerchantCredential,
    algorithm: SignatureAlgorithm,
    canonical: &[u8],
) -> Result<Signature, SigningError> {
    Ok(Signature {
        algorithm,
        encoding: SignatureEncoding::Hex,
        digest: compute_mac(credential.secret_bytes(), algorithm, canonical)?,
    })
}

/// Returns true only if `candidate` is a valid signature over `canonical`.
///
/// Never errors: a malformed candidate is reported as `false`.
pub fn verify(credential: &MerchantCredential, canonical: &[u8], candidate: &EncodedSignature) -> bool {
    check(credential, canonical, candidate).is_valid()
}

/// Like [`verify`] but distinguishes malformed candidates from mismatches.
pub fn check(
    credential: &MerchantCredential,
    canonical: &[u8],
    candidate: &EncodedSignature,
) -> Verification {
    let presented = match Signature::decode(candidate) {
        Ok(signature) => signature,
        Err(e) => {
            tracing::warn!(
                code = %ErrorCode::MalformedSignature,
                account_id = %credential.account_id(),
                algorithm = %candidate.algorithm,
                reason = %e,
                "Malformed signature candidate"
            );
            return Verification::Malformed;
        }
    };

    let expected = match compute_mac(credential.secret_bytes(), candidate.algorithm, canonical) {
        Ok(digest) => digest,
        Err(_) => return Verification::Mismatch,
    };

    if constant_time_compare(&expected, &presented.digest) {
        Verification::Valid
    } else {
        Verification::Mismatch
    }
}

fn compute_mac(
    secret: &[u8],
    algorithm: SignatureAlgorithm,
    data: &[u8],
) -> Result<Vec<u8>, SigningError> {
    match algorithm {
        SignatureAlgorithm::HmacSha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(secret).map_err(|_| SigningError::InvalidKey)?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        SignatureAlgorithm::HmacSha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(secret).map_err(|_| SigningError::InvalidKey)?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
