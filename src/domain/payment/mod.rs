//! Payment domain module.
//!
//! Outbound request building, inbound callback validation and the payment
//! status state machine.
//!
//! # Module Structure
//!
//! - `request` - Payment request value types and invariants
//! - `builder` - Signed outbound requests
//! - `response` - Signed provider response verification
//! - `callback` - Raw and verified callback shapes
//! - `validator` - Callback signature, freshness and field checks
//! - `status` - Payment status and its transition rules
//! - `record` - Persisted payment snapshot
//! - `transition` - `apply`: event + record -> next record + side effects

mod builder;
mod callback;
mod callback_errors;
mod errors;
mod record;
mod request;
mod response;
mod side_effect;
mod status;
mod transition;
mod validator;

pub use builder::{
    RequestBuilder, RequestContext, SignedRequest, DEFAULT_API_ENDPOINT, HEADER_ACCOUNT,
    HEADER_ALGORITHM, HEADER_METHOD, HEADER_NONCE, HEADER_TIMESTAMP, HEADER_TRANSACTION_ID,
};
pub use callback::{CallbackEvent, RawCallback};
pub use callback_errors::{CallbackRejection, REJECTED_CALLBACK_MESSAGE};
pub use errors::{RequestError, TransitionError};
pub use record::PaymentRecord;
pub use request::{
    validate_reference, CallbackUrls, Customer, Item, Language, PaymentRequest,
    REFERENCE_MAX_LEN,
};
pub use response::{request_id, ResponseSignatureError, ResponseVerifier, REQUEST_ID_HEADER};
pub use side_effect::SideEffect;
pub use status::PaymentStatus;
pub use transition::{apply, Transition, TransitionOutcome};
pub use validator::{
    CallbackValidator, FreshnessPolicy, DEFAULT_CLOCK_SKEW_SECS, DEFAULT_TOLERANCE_SECS,
    FIELD_AMOUNT, FIELD_PROVIDER, FIELD_REFERENCE, FIELD_STAMP, FIELD_STATUS,
};
