//! Payment command handlers.

mod create_payment;
mod errors;
mod handle_callback;

pub use create_payment::{
    CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult, PaymentCreated,
};
pub use errors::{CallbackHandlingError, CreatePaymentError};
pub use handle_callback::{CallbackAcknowledgement, HandleCallbackHandler};
