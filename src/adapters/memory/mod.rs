//! In-memory adapters.

mod in_memory_payment_store;

pub use in_memory_payment_store::InMemoryPaymentStore;
