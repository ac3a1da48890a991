//! Callback validator.
//!
//! Turns a [`RawCallback`] into a trusted [`CallbackEvent`]. Checks run in a
//! fixed order and the first failure wins:
//!
//! 1. signature present
//! 2. signature verifies over the canonical `checkout-*` fields (+ body)
//! 3. timestamp inside the freshness window
//! 4. merchant reference well-formed
//! 5. transaction id, status and amount parse
//!
//! Nothing here touches a payment record.

use chrono::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::signing::{
    canonicalize, check, EncodedSignature, MerchantCredential, SignableMessage, Signature,
    SignatureAlgorithm, SIGNATURE_FIELD,
};

use super::builder::{HEADER_ACCOUNT, HEADER_ALGORITHM, HEADER_NONCE, HEADER_TIMESTAMP, HEADER_TRANSACTION_ID};
use super::{validate_reference, CallbackEvent, CallbackRejection, PaymentStatus, RawCallback};

pub const FIELD_AMOUNT: &str = "checkout-amount";
pub const FIELD_STAMP: &str = "checkout-stamp";
pub const FIELD_REFERENCE: &str = "checkout-reference";
pub const FIELD_STATUS: &str = "checkout-status";
pub const FIELD_PROVIDER: &str = "checkout-provider";

/// Default maximum callback age.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Default allowance for a sender clock running ahead of ours.
pub const DEFAULT_CLOCK_SKEW_SECS: i64 = 60;

/// How old (or how far in the future) a callback timestamp may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub tolerance_secs: i64,
    pub clock_skew_secs: i64,
}

impl FreshnessPolicy {
    pub fn new(tolerance_secs: i64, clock_skew_secs: i64) -> Self {
        Self {
            tolerance_secs,
            clock_skew_secs,
        }
    }

    /// True if `timestamp` is acceptable at `now`.
    pub fn is_fresh(&self, timestamp: &Timestamp, now: &Timestamp) -> bool {
        let age = now.duration_since(timestamp);
        age <= Duration::seconds(self.tolerance_secs)
            && age >= -Duration::seconds(self.clock_skew_secs)
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS, DEFAULT_CLOCK_SKEW_SECS)
    }
}

/// Verifies callbacks for one merchant account.
#[derive(Debug, Clone)]
pub struct CallbackValidator {
    credential: MerchantCredential,
    freshness: FreshnessPolicy,
}

impl CallbackValidator {
    pub fn new(credential: MerchantCredential, freshness: FreshnessPolicy) -> Self {
        Self {
            credential,
            freshness,
        }
    }

    pub fn freshness(&self) -> FreshnessPolicy {
        self.freshness
    }

    /// Validates against the current time.
    pub fn validate(&self, raw: RawCallback) -> Result<CallbackEvent, CallbackRejection> {
        self.validate_at(raw, Timestamp::now())
    }

    /// Validates against an explicit clock reading.
    pub fn validate_at(
        &self,
        raw: RawCallback,
        now: Timestamp,
    ) -> Result<CallbackEvent, CallbackRejection> {
        let kind = raw.kind();
        self.run_checks(raw, now).map_err(|rejection| {
            tracing::warn!(
                code = %rejection.code(),
                kind,
                account_id = %self.credential.account_id(),
                reason = %rejection,
                "Callback rejected"
            );
            rejection
        })
    }

    fn run_checks(
        &self,
        raw: RawCallback,
        now: Timestamp,
    ) -> Result<CallbackEvent, CallbackRejection> {
        let (pairs, body) = raw.into_parts();

        let signature_value = pairs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(SIGNATURE_FIELD))
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(CallbackRejection::MissingSignature)?;

        let mut fields = SignableMessage::from_signed_fields(pairs);
        if let Some(body) = body {
            fields = fields.with_body(body);
        }

        let signature = self.verify_signature(&fields, signature_value)?;

        let timestamp = fields
            .get(HEADER_TIMESTAMP)
            .and_then(|value| Timestamp::parse_rfc3339(HEADER_TIMESTAMP, value).ok())
            .ok_or(CallbackRejection::StaleCallback)?;
        if !self.freshness.is_fresh(&timestamp, &now) {
            return Err(CallbackRejection::StaleCallback);
        }

        let merchant_reference = fields
            .get(FIELD_REFERENCE)
            .filter(|value| validate_reference(FIELD_REFERENCE, value).is_ok())
            .ok_or(CallbackRejection::UnknownReference)?
            .to_string();

        let provider_transaction_id = non_empty(&fields, HEADER_TRANSACTION_ID)
            .ok_or(CallbackRejection::MalformedCallback(HEADER_TRANSACTION_ID))?;

        let raw_status = non_empty(&fields, FIELD_STATUS)
            .ok_or(CallbackRejection::MalformedCallback(FIELD_STATUS))?;
        let reported_status = PaymentStatus::from_provider(&raw_status)
            .ok_or(CallbackRejection::MalformedCallback(FIELD_STATUS))?;

        let amount = match non_empty(&fields, FIELD_AMOUNT) {
            Some(value) => Some(
                value
                    .parse::<i64>()
                    .ok()
                    .filter(|amount| *amount >= 0)
                    .ok_or(CallbackRejection::MalformedCallback(FIELD_AMOUNT))?,
            ),
            None => None,
        };

        tracing::debug!(
            merchant_reference = %merchant_reference,
            transaction_id = %provider_transaction_id,
            status = ?reported_status,
            "Callback verified"
        );

        Ok(CallbackEvent {
            merchant_reference,
            provider_transaction_id,
            reported_status,
            raw_status,
            signature,
            timestamp,
            nonce: non_empty(&fields, HEADER_NONCE),
            stamp: non_empty(&fields, FIELD_STAMP),
            amount,
            provider: non_empty(&fields, FIELD_PROVIDER),
            fields,
        })
    }

    /// Every failure mode collapses to `SignatureMismatch`.
    fn verify_signature(
        &self,
        fields: &SignableMessage,
        value: String,
    ) -> Result<Signature, CallbackRejection> {
        if let Some(account) = fields.get(HEADER_ACCOUNT) {
            if account != self.credential.account_id() {
                return Err(CallbackRejection::SignatureMismatch);
            }
        }

        let algorithm = match fields.get(HEADER_ALGORITHM) {
            Some(declared) => declared
                .parse::<SignatureAlgorithm>()
                .map_err(|_| CallbackRejection::SignatureMismatch)?,
            None => self.credential.algorithm(),
        };

        let canonical = canonicalize(fields).map_err(|_| CallbackRejection::SignatureMismatch)?;
        let candidate = EncodedSignature::hex(algorithm, value);

        if !check(&self.credential, &canonical, &candidate).is_valid() {
            return Err(CallbackRejection::SignatureMismatch);
        }

        Signature::decode(&candidate).map_err(|_| CallbackRejection::SignatureMismatch)
    }
}

fn non_empty(fields: &SignableMessage, name: &str) -> Option<String> {
    fields
        .get(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
