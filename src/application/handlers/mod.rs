//! Application handlers.
//!
//! Command handlers that orchestrate the payment domain and its ports.

pub mod payment;

pub use payment::{
    CallbackAcknowledgement, CallbackHandlingError, CreatePaymentCommand, CreatePaymentError,
    CreatePaymentHandler, CreatePaymentResult, HandleCallbackHandler, PaymentCreated,
};
