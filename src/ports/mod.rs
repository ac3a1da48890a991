//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentStore` - Persistence of payment record snapshots
//! - `PaymentTransport` - Delivery of signed requests to the provider

mod payment_store;
mod payment_transport;

pub use payment_store::PaymentStore;
pub use payment_transport::{PaymentTransport, RawResponse, TransportError};
