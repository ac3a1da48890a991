//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `checkout` - HTTP transport to the provider API
//! - `memory` - In-memory payment store

pub mod checkout;
pub mod memory;

pub use checkout::HttpPaymentTransport;
pub use memory::InMemoryPaymentStore;
