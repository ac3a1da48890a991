//! Payment store port.
//!
//! Persists `PaymentRecord` snapshots keyed by merchant reference. The store
//! never interprets a record; all status changes come from the domain's
//! `apply` function.
//!
//! # Example
//!
//! ```ignore
//! async fn reconcile(
//!     store: &dyn PaymentStore,
//!     event: &CallbackEvent,
//! ) -> Result<Transition, DomainError> {
//!     let current = store.load(&event.merchant_reference).await?;
//!     let transition = apply(current.as_ref(), event)?;
//!     if transition.is_applied() {
//!         store.save(&transition.record).await?;
//!     }
//!     Ok(transition)
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::PaymentRecord;

/// Storage port for payment records.
///
/// Implementations must make `save` an upsert on `merchant_reference`.
/// Callers serialize load-apply-save per reference.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Load the record for a merchant reference.
    ///
    /// Returns `None` if no payment was created with that reference.
    async fn load(&self, merchant_reference: &str) -> Result<Option<PaymentRecord>, DomainError>;

    /// Insert or replace a record.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, record: &PaymentRecord) -> Result<(), DomainError>;
}
