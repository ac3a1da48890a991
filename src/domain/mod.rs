//! Domain layer containing the signing core and payment lifecycle.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, error codes, state machine trait)
//! - `signing` - Canonical form, credentials, HMAC sign/verify
//! - `payment` - Request building, callback validation, payment state machine

pub mod foundation;
pub mod payment;
pub mod signing;
