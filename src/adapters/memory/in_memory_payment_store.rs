//! In-memory payment store.
//!
//! Backs tests and single-process deployments. Records live in a
//! `HashMap` behind a `tokio::sync::RwLock`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::payment::PaymentRecord;
use crate::ports::PaymentStore;

/// Payment store keyed by merchant reference.
#[derive(Debug, Default)]
pub struct InMemoryPaymentStore {
    records: RwLock<HashMap<String, PaymentRecord>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record, in no particular order.
    pub async fn all(&self) -> Vec<PaymentRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn load(&self, merchant_reference: &str) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(self.records.read().await.get(merchant_reference).cloned())
    }

    async fn save(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert(record.merchant_reference.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::payment::PaymentStatus;

    fn record(reference: &str, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            merchant_reference: reference.to_string(),
            stamp: None,
            amount: 1000,
            currency: "EUR".to_string(),
            provider_transaction_id: None,
            status,
            last_event_timestamp: None,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn load_missing_returns_none() {
        let store = InMemoryPaymentStore::new();
        assert!(store.load("order-1").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = InMemoryPaymentStore::new();
        let saved = record("order-1", PaymentStatus::Created);

        store.save(&saved).await.unwrap();

        assert_eq!(store.load("order-1").await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let store = InMemoryPaymentStore::new();
        store.save(&record("order-1", PaymentStatus::Created)).await.unwrap();
        store.save(&record("order-1", PaymentStatus::Paid)).await.unwrap();

        let loaded = store.load("order-1").await.unwrap().unwrap();

        assert_eq!(loaded.status, PaymentStatus::Paid);
        assert_eq!(store.len().await, 1);
    }
}
