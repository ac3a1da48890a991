//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, diagnostic codes, error types and the state
//! machine trait used across the signing and payment modules.

mod errors;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
