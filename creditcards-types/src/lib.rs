//! # Credit Cards Types
//!
//! Domain types and port traits for the credit cards service.
//! This crate has ZERO external IO dependencies - only data structures,
//! filtering rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Canonical credit card record, query filter and paging types
//! - `ports/` - Trait definitions that persistence adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Address, CreditCard, CreditCardFilter, CreditCardState, CreditCardType, DataPage,
    PagingParams,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{Credential, CredentialResolver, CreditCardsPersistence, Openable};
