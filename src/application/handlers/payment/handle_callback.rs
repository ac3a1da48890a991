//! HandleCallbackHandler - Verifies a provider callback and applies it.

use http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{
    apply, CallbackEvent, CallbackValidator, PaymentStatus, RawCallback, SideEffect,
    TransitionOutcome,
};
use crate::ports::PaymentStore;

use super::CallbackHandlingError;

/// What the endpoint tells the provider, and what the application owes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAcknowledgement {
    pub merchant_reference: String,
    /// Record status after the callback.
    pub status: PaymentStatus,
    pub outcome: TransitionOutcome,
    /// Work for the order-management collaborator. Empty unless `Applied`.
    pub side_effects: Vec<SideEffect>,
}

impl CallbackAcknowledgement {
    /// Always 200: duplicates and stale callbacks are acknowledged too, so
    /// the provider stops retrying.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }
}

/// Handler for inbound callbacks.
///
/// Load-apply-save runs under a per-reference mutex so two deliveries for
/// the same payment cannot both observe the pre-transition record.
/// Callbacks for different payments do not wait on each other.
pub struct HandleCallbackHandler {
    validator: CallbackValidator,
    store: Arc<dyn PaymentStore>,
    reference_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl HandleCallbackHandler {
    pub fn new(validator: CallbackValidator, store: Arc<dyn PaymentStore>) -> Self {
        Self {
            validator,
            store,
            reference_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn handle(
        &self,
        raw: RawCallback,
    ) -> Result<CallbackAcknowledgement, CallbackHandlingError> {
        self.handle_at(raw, Timestamp::now()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit clock reading.
    pub async fn handle_at(
        &self,
        raw: RawCallback,
        now: Timestamp,
    ) -> Result<CallbackAcknowledgement, CallbackHandlingError> {
        // 1. Verify (no lock needed)
        let event = self.validator.validate_at(raw, now)?;

        // 2. Serialize read-modify-write per payment
        let lock = self.lock_for(&event.merchant_reference).await;
        let result = {
            let _guard = lock.lock().await;
            self.apply_and_save(&event).await
        };
        self.release(&event.merchant_reference, lock).await;

        result
    }

    async fn apply_and_save(
        &self,
        event: &CallbackEvent,
    ) -> Result<CallbackAcknowledgement, CallbackHandlingError> {
        let current = self.store.load(&event.merchant_reference).await?;
        let transition = apply(current.as_ref(), event).map_err(|e| {
            tracing::warn!(
                code = %e.code(),
                merchant_reference = %event.merchant_reference,
                transaction_id = %event.provider_transaction_id,
                "Verified callback not applied"
            );
            e
        })?;

        // Persist only real changes
        if transition.is_applied() {
            self.store.save(&transition.record).await?;
        }

        Ok(CallbackAcknowledgement {
            merchant_reference: transition.record.merchant_reference,
            status: transition.record.status,
            outcome: transition.outcome,
            side_effects: transition.side_effects,
        })
    }

    async fn lock_for(&self, reference: &str) -> Arc<Mutex<()>> {
        let mut locks = self.reference_locks.lock().await;
        locks.entry(reference.to_string()).or_default().clone()
    }

    /// Drops the map entry once no other delivery holds or awaits it.
    async fn release(&self, reference: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.reference_locks.lock().await;
        // One reference in the map plus ours.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(reference);
        }
    }
}
