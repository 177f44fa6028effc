//! Credit Cards Controller
//!
//! Validates requests and forwards them to the persistence port.
//! Contains NO infrastructure logic.

use tracing::instrument;

use creditcards_types::{
    AppError, CreditCard, CreditCardFilter, CreditCardState, CreditCardsPersistence, DataPage,
    PagingParams, RepoError,
};

/// Controller for credit card operations.
///
/// Generic over `P: CreditCardsPersistence`; the adapter is chosen at startup.
pub struct CreditCardsController<P: CreditCardsPersistence> {
    persistence: P,
}

impl<P: CreditCardsPersistence> CreditCardsController<P> {
    /// Creates a new controller over the given persistence.
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    /// Returns a reference to the underlying persistence.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Lists cards matching a filter.
    #[instrument(skip(self))]
    pub async fn get_credit_cards(
        &self,
        correlation_id: Option<&str>,
        filter: CreditCardFilter,
        paging: PagingParams,
    ) -> Result<DataPage<CreditCard>, AppError> {
        self.persistence
            .get_page_by_filter(correlation_id, filter, paging)
            .await
            .map_err(Into::into)
    }

    /// Gets a card by id, `None` when it does not exist.
    #[instrument(skip(self))]
    pub async fn get_credit_card_by_id(
        &self,
        correlation_id: Option<&str>,
        card_id: &str,
    ) -> Result<Option<CreditCard>, AppError> {
        let card_id = require_card_id(card_id)?;

        self.persistence
            .get_one_by_id(correlation_id, card_id)
            .await
            .map_err(Into::into)
    }

    /// Creates a card for a customer. New cards start in the `ok` state.
    #[instrument(skip(self, card), fields(customer_id = ?card.customer_id))]
    pub async fn create_credit_card(
        &self,
        correlation_id: Option<&str>,
        mut card: CreditCard,
    ) -> Result<CreditCard, AppError> {
        card.require_customer_id().map_err(RepoError::from)?;
        card.state.get_or_insert(CreditCardState::Ok);

        self.persistence
            .create(correlation_id, card)
            .await
            .map_err(Into::into)
    }

    /// Replaces a card. The returned card carries its current id.
    #[instrument(skip(self, card), fields(card_id = ?card.id))]
    pub async fn update_credit_card(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, AppError> {
        card.require_id().map_err(RepoError::from)?;
        card.require_customer_id().map_err(RepoError::from)?;

        self.persistence
            .update(correlation_id, card)
            .await
            .map_err(Into::into)
    }

    /// Deletes a card, returning it as it was or `None` when it did not exist.
    #[instrument(skip(self))]
    pub async fn delete_credit_card_by_id(
        &self,
        correlation_id: Option<&str>,
        card_id: &str,
    ) -> Result<Option<CreditCard>, AppError> {
        let card_id = require_card_id(card_id)?;

        self.persistence
            .delete_by_id(correlation_id, card_id)
            .await
            .map_err(Into::into)
    }
}

fn require_card_id(card_id: &str) -> Result<&str, AppError> {
    let trimmed = card_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("card_id cannot be empty".into()));
    }
    Ok(trimmed)
}
