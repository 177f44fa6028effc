//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod credentials;
mod lifecycle;
mod persistence;

pub use credentials::{Credential, CredentialResolver};
pub use lifecycle::Openable;
pub use persistence::CreditCardsPersistence;
