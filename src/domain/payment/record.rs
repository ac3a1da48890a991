//! Payment record snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{PaymentRequest, PaymentStatus};

/// Local view of one payment, keyed by merchant reference.
///
/// Only [`apply`](super::apply) produces new snapshots from callbacks; the
/// store persists whatever it is handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub merchant_reference: String,
    pub stamp: Option<String>,
    pub amount: i64,
    pub currency: String,
    /// Assigned by the provider on creation, or adopted from the first callback.
    pub provider_transaction_id: Option<String>,
    pub status: PaymentStatus,
    /// Timestamp of the newest callback folded into this record.
    pub last_event_timestamp: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl PaymentRecord {
    /// Initial `Created` record for a dispatched request.
    pub fn created(request: &PaymentRequest, created_at: Timestamp) -> Self {
        Self {
            merchant_reference: request.reference.clone(),
            stamp: request.stamp.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            provider_transaction_id: None,
            status: PaymentStatus::Created,
            last_event_timestamp: None,
            created_at,
        }
    }

    /// Records the provider's transaction id from the creation response.
    pub fn bind_transaction(mut self, transaction_id: impl Into<String>) -> Self {
        self.provider_transaction_id = Some(transaction_id.into());
        self
    }

    /// Still `Created` with no provider transaction: the provider never
    /// confirmed the creation and no callback has arrived for it.
    pub fn is_unconfirmed(&self) -> bool {
        self.status == PaymentStatus::Created && self.provider_transaction_id.is_none()
    }

    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }
}
