//! PayPal vault persistence adapter.
//!
//! The vault API only filters by `external_customer_id`, pages in fixed-size
//! batches and treats several card fields as read-only. This adapter emulates
//! the rest of the persistence contract on top of it:
//! - filters other than customer are applied after decoding each page
//! - `skip`/`take` are applied while walking backend pages
//! - `update` deletes the card and creates it again

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use creditcards_types::{
    CredentialResolver, CreditCard, CreditCardFilter, CreditCardsPersistence, DataPage, Openable,
    PagingParams, RepoError,
};

pub mod mapping;
pub mod rest;
pub mod vault;

pub use rest::{PayPalRestClient, PayPalRestConnector};
pub use vault::{
    CreditCardVault, VaultConnector, VaultCreditCard, VaultError, VaultListOptions, VaultMode,
    VaultPage,
};

use mapping::{from_public, to_public};

/// Number of cards requested per vault listing call.
pub const PAGE_SIZE: usize = 20;

/// Settings recognized by [`PayPalPersistence::configure`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayPalConfig {
    /// `options.sandbox`: use the sandbox environment instead of live.
    pub sandbox: bool,
}

/// Credit card persistence backed by the PayPal vault.
///
/// Holds no records, only the vault client created by `open`.
pub struct PayPalPersistence {
    sandbox: bool,
    credential_resolver: Option<Arc<dyn CredentialResolver>>,
    connector: Arc<dyn VaultConnector>,
    client: RwLock<Option<Arc<dyn CreditCardVault>>>,
}

impl Default for PayPalPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl PayPalPersistence {
    /// Creates a closed persistence using the PayPal REST API.
    pub fn new() -> Self {
        Self::with_connector(Arc::new(PayPalRestConnector::default()))
    }

    /// Creates a closed persistence that obtains its vault client from `connector`.
    pub fn with_connector(connector: Arc<dyn VaultConnector>) -> Self {
        Self {
            sandbox: false,
            credential_resolver: None,
            connector,
            client: RwLock::new(None),
        }
    }

    /// Applies settings. Takes effect on the next `open`.
    pub fn configure(&mut self, config: &PayPalConfig) {
        self.sandbox = config.sandbox;
    }

    /// Wires the resolver `open` takes credentials from.
    pub fn set_references(&mut self, credential_resolver: Arc<dyn CredentialResolver>) {
        self.credential_resolver = Some(credential_resolver);
    }

    fn client(&self) -> Result<Arc<dyn CreditCardVault>, RepoError> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(RepoError::NotOpened)
    }
}

#[async_trait]
impl Openable for PayPalPersistence {
    fn is_opened(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    #[instrument(skip(self))]
    async fn open(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        if self.is_opened() {
            return Ok(());
        }

        let resolver = self.credential_resolver.as_ref().ok_or_else(|| {
            RepoError::Credentials("No credential resolver configured for PayPal".into())
        })?;
        let credential = resolver.lookup(correlation_id).await?;

        let mode = VaultMode::from_sandbox(self.sandbox);
        let client = self.connector.connect(mode, &credential)?;

        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
        info!("Connected to PayPal vault in {} mode", mode);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn close(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        let previous = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Disconnected from PayPal vault");
        }
        Ok(())
    }
}

#[async_trait]
impl CreditCardsPersistence for PayPalPersistence {
    #[instrument(skip(self))]
    async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: CreditCardFilter,
        paging: PagingParams,
    ) -> Result<DataPage<CreditCard>, RepoError> {
        let client = self.client()?;

        let mut skip = paging.skip();
        let take = paging.take();
        let mut items = Vec::new();
        let mut page: u32 = 0;

        loop {
            page += 1;

            let options = VaultListOptions {
                page,
                page_size: PAGE_SIZE as u32,
                external_customer_id: filter.customer_id().map(str::to_string),
            };
            let data = client.list(options).await?;
            let page_len = data.items.len();

            for item in data.items.into_iter().map(to_public) {
                if !filter.matches(&item) {
                    continue;
                }

                if skip > 0 {
                    skip -= 1;
                    continue;
                }

                if items.len() < take {
                    items.push(item);
                }
            }

            if page_len != PAGE_SIZE || items.len() >= take {
                break;
            }
        }

        debug!("Retrieved {} credit cards from {} vault pages", items.len(), page);
        Ok(DataPage::new(items))
    }

    #[instrument(skip(self))]
    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError> {
        let client = self.client()?;

        match client.get(id).await {
            Ok(card) => Ok(Some(to_public(card))),
            Err(VaultError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, card), fields(customer_id = ?card.customer_id))]
    async fn create(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError> {
        let client = self.client()?;

        let created = client.create(from_public(&card)).await?;
        let created = to_public(created);
        debug!("Created credit card {:?}", created.id);
        Ok(created)
    }

    #[instrument(skip(self, card), fields(card_id = ?card.id))]
    async fn update(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError> {
        let client = self.client()?;
        let id = card.require_id()?;
        let payload = from_public(&card);

        // Several vault fields are read-only, so replace the card wholesale.
        client.delete(id).await?;
        let created = to_public(client.create(payload).await?);

        debug!("Replaced credit card {} with {:?}", id, created.id);
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError> {
        let client = self.client()?;

        let existing = match client.get(id).await {
            Ok(card) => to_public(card),
            Err(VaultError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        client.delete(id).await?;
        Ok(Some(existing))
    }

    /// Deletes every card in the vault.
    ///
    /// Always re-reads page 1: deleted cards leave the listing, so advancing
    /// the page number would skip full pages.
    #[instrument(skip(self))]
    async fn clear(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        let client = self.client()?;
        let mut deleted = 0;

        loop {
            // Deleted cards drop out of the listing, so the first page always
            // holds the next batch.
            let options = VaultListOptions {
                page: 1,
                page_size: PAGE_SIZE as u32,
                external_customer_id: None,
            };
            let data = client.list(options).await?;
            let page_len = data.items.len();

            let ids: Vec<&str> = data
                .items
                .iter()
                .filter_map(|card| card.id.as_deref())
                .collect();
            try_join_all(ids.iter().map(|id| client.delete(id))).await?;
            deleted += ids.len();

            if page_len != PAGE_SIZE || ids.is_empty() {
                break;
            }
        }

        info!("Cleared {} credit cards from PayPal vault", deleted);
        Ok(())
    }
}
