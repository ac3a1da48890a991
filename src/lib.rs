//! Checkout PSP - Signed payment client core
//!
//! Builds signed requests for the Checkout payment service API, verifies
//! signed responses and callbacks, and folds verified callbacks into a
//! payment status state machine.
//!
//! Layout follows hexagonal architecture: `domain` holds the synchronous
//! core, `ports` the store and transport contracts, `adapters` their
//! implementations and `application` the handlers that wire them together.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
