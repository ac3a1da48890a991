//! Provider API adapters.

mod http_transport;

pub use http_transport::{HttpPaymentTransport, DEFAULT_TIMEOUT};
