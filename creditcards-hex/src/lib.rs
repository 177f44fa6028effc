//! # Credit Cards Hex
//!
//! Controller layer and HTTP adapter for the credit cards service.
//!
//! ## Architecture
//!
//! - `service/` - Controller (validates requests, drives the persistence port)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The controller is generic over `P: CreditCardsPersistence`, so the in-memory
//! store and the PayPal vault adapter plug in the same way.

pub mod inbound;
pub mod service;


pub use service::CreditCardsController;
