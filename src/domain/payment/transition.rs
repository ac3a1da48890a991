//! Folding verified callbacks into payment records.

use crate::domain::foundation::{ErrorCode, StateMachine};

use super::validator::{FIELD_AMOUNT, FIELD_STAMP};
use super::{CallbackEvent, PaymentRecord, SideEffect, TransitionError};

/// What `apply` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Status changed; side effects are owed.
    Applied,
    /// Event repeats the current status.
    Duplicate,
    /// Event reports a status that is not more final than the current one.
    Stale,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub record: PaymentRecord,
    pub side_effects: Vec<SideEffect>,
    pub outcome: TransitionOutcome,
}

impl Transition {
    fn unchanged(record: &PaymentRecord, outcome: TransitionOutcome) -> Self {
        Self {
            record: record.clone(),
            side_effects: Vec::new(),
            outcome,
        }
    }

    /// True if the record must be saved.
    pub fn is_applied(&self) -> bool {
        self.outcome == TransitionOutcome::Applied
    }
}

/// Applies a verified callback to the current record.
///
/// Pure: no I/O and no clock reads. The caller must not apply two events to
/// the same snapshot concurrently.
///
/// # Errors
///
/// - `UnknownPayment` if there is no record for the event's reference
/// - `TransactionMismatch` if the record belongs to another provider transaction
/// - `InvalidTransition` for a more final status that is not reachable
pub fn apply(
    current: Option<&PaymentRecord>,
    event: &CallbackEvent,
) -> Result<Transition, TransitionError> {
    let record = current
        .filter(|r| r.merchant_reference == event.merchant_reference)
        .ok_or_else(|| TransitionError::UnknownPayment {
            merchant_reference: event.merchant_reference.clone(),
        })?;

    if let Some(bound) = &record.provider_transaction_id {
        if *bound != event.provider_transaction_id {
            return Err(TransitionError::TransactionMismatch {
                merchant_reference: record.merchant_reference.clone(),
            });
        }
    }

    let mismatched = mismatched_fields(record, event);
    if !mismatched.is_empty() {
        tracing::warn!(
            code = %ErrorCode::FieldMismatch,
            merchant_reference = %record.merchant_reference,
            fields = ?mismatched,
            expected_amount = record.amount,
            reported_amount = ?event.amount,
            "Signed callback disagrees with payment record"
        );
    }

    let from = record.status;
    let to = event.reported_status;

    if from == to {
        return Ok(Transition::unchanged(record, TransitionOutcome::Duplicate));
    }

    if to.finality() < from.finality() {
        tracing::info!(
            code = %ErrorCode::StaleTransition,
            merchant_reference = %record.merchant_reference,
            current = ?from,
            reported = ?to,
            "Ignoring out-of-order callback"
        );
        return Ok(Transition::unchanged(record, TransitionOutcome::Stale));
    }

    if to.finality() == from.finality() {
        // Two different outcomes for one payment; keep the first.
        tracing::warn!(
            code = %ErrorCode::StaleTransition,
            merchant_reference = %record.merchant_reference,
            current = ?from,
            reported = ?to,
            "Conflicting final status ignored"
        );
        return Ok(Transition::unchanged(record, TransitionOutcome::Stale));
    }

    if !from.can_transition_to(&to) {
        return Err(TransitionError::InvalidTransition { from, to });
    }

    let mut next = record.clone();
    next.status = to;
    next.provider_transaction_id = Some(event.provider_transaction_id.clone());
    next.last_event_timestamp = Some(match record.last_event_timestamp {
        Some(previous) => previous.max(event.timestamp),
        None => event.timestamp,
    });

    tracing::info!(
        merchant_reference = %next.merchant_reference,
        from = ?from,
        to = ?to,
        "Payment status changed"
    );

    Ok(Transition {
        record: next,
        side_effects: SideEffect::for_status(to),
        outcome: TransitionOutcome::Applied,
    })
}

/// Signed callback fields that contradict the record. Absent fields never count.
fn mismatched_fields(record: &PaymentRecord, event: &CallbackEvent) -> Vec<&'static str> {
    let mut mismatched = Vec::new();
    if event.amount.is_some_and(|amount| amount != record.amount) {
        mismatched.push(FIELD_AMOUNT);
    }
    if let (Some(reported), Some(expected)) = (&event.stamp, &record.stamp) {
        if reported != expected {
            mismatched.push(FIELD_STAMP);
        }
    }
    mismatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::signing::{SignableMessage, Signature, SignatureAlgorithm, SignatureEncoding};

    fn at(secs: i64) -> Timestamp {
        Timestamp::parse_rfc3339("t", "2024-01-15T10:00:00Z")
            .unwrap()
            .plus_secs(secs)
    }

    fn record(status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            merchant_reference: "order-42".to_string(),
            stamp: Some("stamp-1".to_string()),
            amount: 1000,
            currency: "EUR".to_string(),
            provider_transaction_id: Some("tx-1".to_string()),
            status,
            last_event_timestamp: None,
            created_at: at(0),
        }
    }

    fn event(status: PaymentStatus, secs: i64) -> CallbackEvent {
        CallbackEvent {
            merchant_reference: "order-42".to_string(),
            provider_transaction_id: "tx-1".to_string(),
            reported_status: status,
            raw_status: format!("{:?}", status).to_lowercase(),
            signature: Signature {
                algorithm: SignatureAlgorithm::HmacSha256,
                encoding: SignatureEncoding::Hex,
                digest: vec![0; 32],
            },
            timestamp: at(secs),
            nonce: None,
            stamp: None,
            amount: Some(1000),
            provider: None,
            fields: SignableMessage::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Accepted transitions
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn created_to_paid_marks_order_paid() {
        let current = record(PaymentStatus::Created);

        let t = apply(Some(&current), &event(PaymentStatus::Paid, 10)).unwrap();

        assert_eq!(t.outcome, TransitionOutcome::Applied);
        assert_eq!(t.record.status, PaymentStatus::Paid);
        assert_eq!(t.record.last_event_timestamp, Some(at(10)));
        assert_eq!(t.side_effects, vec![SideEffect::MarkOrderPaid]);
    }

    #[test]
    fn pending_to_failed_releases_inventory() {
        let t = apply(
            Some(&record(PaymentStatus::Pending)),
            &event(PaymentStatus::Failed, 10),
        )
        .unwrap();

        assert_eq!(
            t.side_effects,
            vec![SideEffect::MarkOrderFailed, SideEffect::ReleaseInventoryHold]
        );
    }

    #[test]
    fn paid_to_refunded_is_accepted() {
        let t = apply(
            Some(&record(PaymentStatus::Paid)),
            &event(PaymentStatus::Refunded, 10),
        )
        .unwrap();

        assert_eq!(t.record.status, PaymentStatus::Refunded);
        assert_eq!(t.side_effects, vec![SideEffect::MarkOrderRefunded]);
    }

    #[test]
    fn unbound_record_adopts_transaction_id() {
        let mut current = record(PaymentStatus::Created);
        current.provider_transaction_id = None;

        let t = apply(Some(&current), &event(PaymentStatus::Pending, 1)).unwrap();

        assert_eq!(t.record.provider_transaction_id.as_deref(), Some("tx-1"));
    }

    #[test]
    fn last_event_timestamp_never_moves_backwards() {
        let mut current = record(PaymentStatus::Pending);
        current.last_event_timestamp = Some(at(100));

        let t = apply(Some(&current), &event(PaymentStatus::Paid, 50)).unwrap();

        assert_eq!(t.record.last_event_timestamp, Some(at(100)));
    }

    // ═══════════════════════════════════════════════════════════════
    // Idempotence and ordering
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn applying_same_event_twice_equals_applying_once() {
        let current = record(PaymentStatus::Created);
        let paid = event(PaymentStatus::Paid, 10);

        let once = apply(Some(&current), &paid).unwrap();
        let twice = apply(Some(&once.record), &paid).unwrap();

        assert_eq!(twice.outcome, TransitionOutcome::Duplicate);
        assert_eq!(twice.record, once.record);
        assert!(twice.side_effects.is_empty());
    }

    #[test]
    fn pending_after_paid_is_stale() {
        let current = record(PaymentStatus::Paid);

        let t = apply(Some(&current), &event(PaymentStatus::Pending, 20)).unwrap();

        assert_eq!(t.outcome, TransitionOutcome::Stale);
        assert_eq!(t.record, current);
        assert!(t.side_effects.is_empty());
    }

    #[test]
    fn conflicting_outcome_keeps_first() {
        let current = record(PaymentStatus::Paid);

        let t = apply(Some(&current), &event(PaymentStatus::Failed, 20)).unwrap();

        assert_eq!(t.outcome, TransitionOutcome::Stale);
        assert_eq!(t.record.status, PaymentStatus::Paid);
    }

    #[test]
    fn created_report_after_pending_is_stale() {
        let t = apply(
            Some(&record(PaymentStatus::Pending)),
            &event(PaymentStatus::Created, 1),
        )
        .unwrap();
        assert_eq!(t.outcome, TransitionOutcome::Stale);
    }

    // ═══════════════════════════════════════════════════════════════
    // Errors
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn missing_record_is_unknown_payment() {
        let err = apply(None, &event(PaymentStatus::Paid, 1)).unwrap_err();
        assert_eq!(
            err,
            TransitionError::UnknownPayment {
                merchant_reference: "order-42".to_string()
            }
        );
    }

    #[test]
    fn record_for_other_reference_is_unknown_payment() {
        let mut current = record(PaymentStatus::Created);
        current.merchant_reference = "order-43".to_string();

        let err = apply(Some(&current), &event(PaymentStatus::Paid, 1)).unwrap_err();

        assert_eq!(err.code(), ErrorCode::UnknownPayment);
    }

    #[test]
    fn other_transaction_is_rejected() {
        let mut current = record(PaymentStatus::Created);
        current.provider_transaction_id = Some("tx-other".to_string());

        let err = apply(Some(&current), &event(PaymentStatus::Paid, 1)).unwrap_err();

        assert_eq!(err.code(), ErrorCode::TransactionMismatch);
    }

    #[test]
    fn failed_cannot_be_refunded() {
        let err = apply(
            Some(&record(PaymentStatus::Failed)),
            &event(PaymentStatus::Refunded, 1),
        )
        .unwrap_err();

        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: PaymentStatus::Failed,
                to: PaymentStatus::Refunded,
            }
        );
    }

    // ═══════════════════════════════════════════════════════════════
    // Field consistency
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn matching_fields_raise_nothing() {
        let mut e = event(PaymentStatus::Paid, 1);
        e.stamp = Some("stamp-1".to_string());

        assert!(mismatched_fields(&record(PaymentStatus::Created), &e).is_empty());
    }

    #[test]
    fn absent_fields_raise_nothing() {
        let mut e = event(PaymentStatus::Paid, 1);
        e.amount = None;

        assert!(mismatched_fields(&record(PaymentStatus::Created), &e).is_empty());
    }

    #[test]
    fn amount_and_stamp_disagreement_is_reported() {
        let mut e = event(PaymentStatus::Paid, 1);
        e.amount = Some(1);
        e.stamp = Some("stamp-2".to_string());

        assert_eq!(
            mismatched_fields(&record(PaymentStatus::Created), &e),
            vec!["checkout-amount", "checkout-stamp"]
        );
    }

    #[test]
    fn amount_disagreement_does_not_block_transition() {
        let mut e = event(PaymentStatus::Paid, 1);
        e.amount = Some(1);

        let t = apply(Some(&record(PaymentStatus::Created)), &e).unwrap();

        assert_eq!(t.outcome, TransitionOutcome::Applied);
        assert_eq!(t.record.amount, 1000);
    }
}
