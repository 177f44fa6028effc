//! Persistence port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (in-memory, PayPal vault) implement this trait.

use crate::domain::{CreditCard, CreditCardFilter, DataPage, PagingParams};
use crate::error::RepoError;
use crate::ports::Openable;

/// The persistence port for credit card records.
///
/// Every operation takes an optional correlation id. It is only recorded for
/// tracing and never influences the result.
#[async_trait::async_trait]
pub trait CreditCardsPersistence: Openable + Send + Sync + 'static {
    /// Lists cards matching `filter`, windowed by `paging`.
    async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: CreditCardFilter,
        paging: PagingParams,
    ) -> Result<DataPage<CreditCard>, RepoError>;

    /// Gets a card by ID. A missing card is `Ok(None)`.
    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError>;

    /// Stores a new card. Any `id` on the input is discarded.
    async fn create(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError>;

    /// Replaces the card identified by `card.id`.
    ///
    /// Backends may assign a new identity; callers must use the returned id.
    async fn update(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError>;

    /// Deletes a card and returns it as it was. A missing card is `Ok(None)`.
    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError>;

    /// Deletes every card. Only meant for tests and teardown.
    async fn clear(&self, correlation_id: Option<&str>) -> Result<(), RepoError>;
}
