//! Payment status state machine.
//!
//! ```text
//! Created ──► Pending ──► Paid ──► Refunded
//!    │           ├──────► Failed
//!    │           └──────► Expired
//!    └──► Paid | Failed | Expired
//! ```

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a single payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Request built and dispatched, nothing heard from the provider yet.
    Created,

    /// Provider accepted the payment but has not settled it.
    Pending,

    /// Funds captured.
    Paid,

    /// Payment was declined or cancelled.
    Failed,

    /// Payment window closed without completion.
    Expired,

    /// A paid payment was returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Rank in the finality partial order:
    /// `Created < Pending < {Paid, Failed, Expired} < Refunded`.
    pub fn finality(&self) -> u8 {
        match self {
            PaymentStatus::Created => 0,
            PaymentStatus::Pending => 1,
            PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Expired => 2,
            PaymentStatus::Refunded => 3,
        }
    }

    /// True once the payment has an outcome.
    pub fn is_final(&self) -> bool {
        self.finality() >= 2
    }

    /// Normalizes the provider's `checkout-status` value.
    pub fn from_provider(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" => Some(PaymentStatus::Created),
            "pending" | "delayed" => Some(PaymentStatus::Pending),
            "ok" | "paid" => Some(PaymentStatus::Paid),
            "fail" | "failed" => Some(PaymentStatus::Failed),
            "expired" => Some(PaymentStatus::Expired),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            // From CREATED
            (Created, Pending)
                | (Created, Paid)
                | (Created, Failed)
                | (Created, Expired)
            // From PENDING
                | (Pending, Paid)
                | (Pending, Failed)
                | (Pending, Expired)
            // From PAID
                | (Paid, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Created => vec![Pending, Paid, Failed, Expired],
            Pending => vec![Paid, Failed, Expired],
            Paid => vec![Refunded],
            Failed | Expired | Refunded => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PaymentStatus; 6] = [
        PaymentStatus::Created,
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Failed,
        PaymentStatus::Expired,
        PaymentStatus::Refunded,
    ];

    #[test]
    fn created_can_jump_straight_to_paid() {
        assert_eq!(
            PaymentStatus::Created.transition_to(PaymentStatus::Paid),
            Ok(PaymentStatus::Paid)
        );
    }

    #[test]
    fn paid_can_be_refunded() {
        assert!(PaymentStatus::Paid.can_transition_to(&PaymentStatus::Refunded));
    }

    #[test]
    fn failed_cannot_be_refunded() {
        assert!(PaymentStatus::Failed
            .transition_to(PaymentStatus::Refunded)
            .is_err());
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());
        assert!(!PaymentStatus::Paid.is_terminal());
    }

    #[test]
    fn every_valid_transition_increases_finality() {
        for status in ALL {
            for target in status.valid_transitions() {
                assert!(
                    target.finality() > status.finality(),
                    "{:?} -> {:?} must move towards finality",
                    status,
                    target
                );
            }
        }
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in ALL {
            for target in ALL {
                assert_eq!(
                    status.can_transition_to(&target),
                    status.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    status,
                    target
                );
            }
        }
    }

    #[test]
    fn provider_statuses_are_normalized() {
        assert_eq!(PaymentStatus::from_provider("ok"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::from_provider("PAID"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::from_provider("delayed"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::from_provider("fail"), Some(PaymentStatus::Failed));
        assert_eq!(PaymentStatus::from_provider("new"), Some(PaymentStatus::Created));
        assert_eq!(PaymentStatus::from_provider("settled?"), None);
    }

    #[test]
    fn finality_orders_outcomes_above_pending() {
        assert!(PaymentStatus::Pending.finality() < PaymentStatus::Paid.finality());
        assert_eq!(PaymentStatus::Paid.finality(), PaymentStatus::Failed.finality());
        assert!(PaymentStatus::Refunded.finality() > PaymentStatus::Expired.finality());
        assert!(PaymentStatus::Paid.is_final());
        assert!(!PaymentStatus::Pending.is_final());
    }
}
