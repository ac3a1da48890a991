//! Instructions for the order-management collaborator.

use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// Work the integrating application performs after an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    MarkOrderPending,
    MarkOrderPaid,
    MarkOrderFailed,
    MarkOrderExpired,
    MarkOrderRefunded,
    ReleaseInventoryHold,
}

impl SideEffect {
    /// Effects owed when a payment enters `status`.
    pub fn for_status(status: PaymentStatus) -> Vec<SideEffect> {
        match status {
            PaymentStatus::Created => vec![],
            PaymentStatus::Pending => vec![SideEffect::MarkOrderPending],
            PaymentStatus::Paid => vec![SideEffect::MarkOrderPaid],
            PaymentStatus::Failed => {
                vec![SideEffect::MarkOrderFailed, SideEffect::ReleaseInventoryHold]
            }
            PaymentStatus::Expired => {
                vec![SideEffect::MarkOrderExpired, SideEffect::ReleaseInventoryHold]
            }
            PaymentStatus::Refunded => vec![SideEffect::MarkOrderRefunded],
        }
    }
}
