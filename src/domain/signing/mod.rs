//! Signing domain module.
//!
//! Canonical message form, merchant credentials and the HMAC
//! signer/verifier shared by outbound requests, provider responses and
//! inbound callbacks.
//!
//! # Module Structure
//!
//! - `canonical` - Deterministic byte form of a message
//! - `signer` - HMAC sign / constant-time verify
//! - `signature` - Signature value and hex/base64 encodings
//! - `credential` - Merchant account id + secret
//! - `nonce` - CSPRNG nonces and stamps

mod algorithm;
mod canonical;
mod credential;
mod errors;
mod nonce;
mod signature;
mod signer;

pub use algorithm::SignatureAlgorithm;
pub use canonical::{
    canonicalize, is_signed_field, SignableMessage, SIGNATURE_FIELD, SIGNED_FIELD_PREFIX,
};
pub use credential::MerchantCredential;
pub use errors::SigningError;
pub use nonce::{generate_nonce, generate_stamp};
pub use signature::{EncodedSignature, Signature, SignatureEncoding};
pub use signer::{check, sign, sign_with, verify, Verification};
