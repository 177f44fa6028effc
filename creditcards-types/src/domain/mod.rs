//! Domain models for the credit cards service.

pub mod credit_card;
pub mod query;

pub use credit_card::{Address, CreditCard, CreditCardState, CreditCardType};
pub use query::{CreditCardFilter, DataPage, PagingParams, parse_ids};
