//! Per-request random tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Nonce length in bytes (before base64 encoding).
const NONCE_BYTES: usize = 32;

/// Stamp length in bytes (before hex encoding).
const STAMP_BYTES: usize = 16;

/// Generates a 256-bit nonce from the OS CSPRNG, URL-safe base64 encoded.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generates a 128-bit payment stamp, hex encoded.
pub fn generate_stamp() -> String {
    let mut bytes = [0u8; STAMP_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
