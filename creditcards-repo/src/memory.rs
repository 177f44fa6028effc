//! In-memory persistence adapter.
//!
//! Keeps cards in insertion order. Meant for tests and local runs.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use creditcards_types::{
    CreditCard, CreditCardFilter, CreditCardsPersistence, DataPage, DomainError, Openable,
    PagingParams, RepoError,
};

/// In-memory credit card store.
#[derive(Default)]
pub struct MemoryPersistence {
    items: RwLock<Vec<CreditCard>>,
    opened: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Openable for MemoryPersistence {
    fn is_opened(&self) -> bool {
        self.opened.load(Ordering::Acquire)
    }

    async fn open(&self, _correlation_id: Option<&str>) -> Result<(), RepoError> {
        self.opened.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self, _correlation_id: Option<&str>) -> Result<(), RepoError> {
        self.opened.store(false, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl CreditCardsPersistence for MemoryPersistence {
    #[instrument(skip(self))]
    async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: CreditCardFilter,
        paging: PagingParams,
    ) -> Result<DataPage<CreditCard>, RepoError> {
        let items = self.items.read().await;

        let matching: Vec<&CreditCard> = items
            .iter()
            .filter(|card| match filter.customer_id() {
                Some(customer_id) => card.customer_id.as_deref() == Some(customer_id),
                None => true,
            })
            .filter(|card| filter.matches(card))
            .collect();
        let total = matching.len();

        let data: Vec<CreditCard> = matching
            .into_iter()
            .skip(paging.skip())
            .take(paging.take())
            .cloned()
            .collect();

        debug!("Retrieved {} of {} matching credit cards", data.len(), total);
        if paging.total {
            Ok(DataPage::with_total(data, total))
        } else {
            Ok(DataPage::new(data))
        }
    }

    #[instrument(skip(self))]
    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .find(|card| card.id.as_deref() == Some(id))
            .cloned())
    }

    #[instrument(skip(self, card), fields(customer_id = ?card.customer_id))]
    async fn create(
        &self,
        correlation_id: Option<&str>,
        mut card: CreditCard,
    ) -> Result<CreditCard, RepoError> {
        card.id = Some(Uuid::new_v4().to_string());
        self.items.write().await.push(card.clone());
        Ok(card)
    }

    #[instrument(skip(self, card), fields(card_id = ?card.id))]
    async fn update(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError> {
        let id = card.require_id()?.to_string();
        let mut items = self.items.write().await;

        let slot = items
            .iter_mut()
            .find(|existing| existing.id.as_deref() == Some(id.as_str()))
            .ok_or_else(|| DomainError::CardNotFound(id.clone()))?;
        *slot = card.clone();
        Ok(card)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError> {
        let mut items = self.items.write().await;
        let position = items.iter().position(|card| card.id.as_deref() == Some(id));
        Ok(position.map(|index| items.remove(index)))
    }

    #[instrument(skip(self))]
    async fn clear(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        self.items.write().await.clear();
        Ok(())
    }
}
