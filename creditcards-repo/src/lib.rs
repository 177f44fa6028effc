//! # Credit Cards Repository
//!
//! Concrete persistence implementations (adapters) for the credit cards service.
//! This crate provides the adapters that implement the `CreditCardsPersistence` port:
//! - [`MemoryPersistence`] keeps records in process
//! - [`PayPalPersistence`] stores them in the PayPal credit card vault

use std::sync::Arc;

use async_trait::async_trait;
use creditcards_types::{
    CredentialResolver, CreditCard, CreditCardFilter, CreditCardsPersistence, DataPage, Openable,
    PagingParams, RepoError,
};

pub mod credentials;
pub mod memory;
pub mod paypal;

#[cfg(test)]
mod paypal_tests;

pub use credentials::StaticCredentialResolver;
pub use memory::MemoryPersistence;
pub use paypal::{PayPalConfig, PayPalPersistence, PayPalRestConnector, VaultConnector};

/// How to build the persistence backing the service.
pub enum PersistenceOptions {
    Memory,
    PayPal {
        config: PayPalConfig,
        credentials: Arc<dyn CredentialResolver>,
        connector: Arc<dyn VaultConnector>,
    },
}

/// Unified persistence wrapper over the available adapters.
pub enum Persistence {
    Memory(MemoryPersistence),
    PayPal(PayPalPersistence),
}

/// Build and open a persistence from options.
///
/// This function:
/// 1. Creates the adapter
/// 2. Applies configuration and references
/// 3. Opens it, resolving credentials where needed
///
/// # Examples
///
/// ```ignore
/// let persistence = build_persistence(PersistenceOptions::Memory).await?;
/// ```
pub async fn build_persistence(options: PersistenceOptions) -> Result<Persistence, RepoError> {
    let persistence = match options {
        PersistenceOptions::Memory => Persistence::Memory(MemoryPersistence::new()),
        PersistenceOptions::PayPal {
            config,
            credentials,
            connector,
        } => {
            let mut paypal = PayPalPersistence::with_connector(connector);
            paypal.configure(&config);
            paypal.set_references(credentials);
            Persistence::PayPal(paypal)
        }
    };

    persistence.open(None).await?;
    Ok(persistence)
}

impl Persistence {
    /// Short adapter name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Persistence::Memory(_) => "memory",
            Persistence::PayPal(_) => "paypal",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement the ports for Persistence (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl Openable for Persistence {
    fn is_opened(&self) -> bool {
        match self {
            Persistence::Memory(inner) => inner.is_opened(),
            Persistence::PayPal(inner) => inner.is_opened(),
        }
    }

    async fn open(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        match self {
            Persistence::Memory(inner) => inner.open(correlation_id).await,
            Persistence::PayPal(inner) => inner.open(correlation_id).await,
        }
    }

    async fn close(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        match self {
            Persistence::Memory(inner) => inner.close(correlation_id).await,
            Persistence::PayPal(inner) => inner.close(correlation_id).await,
        }
    }
}

#[async_trait]
impl CreditCardsPersistence for Persistence {
    async fn get_page_by_filter(
        &self,
        correlation_id: Option<&str>,
        filter: CreditCardFilter,
        paging: PagingParams,
    ) -> Result<DataPage<CreditCard>, RepoError> {
        match self {
            Persistence::Memory(inner) => {
                inner
                    .get_page_by_filter(correlation_id, filter, paging)
                    .await
            }
            Persistence::PayPal(inner) => {
                inner
                    .get_page_by_filter(correlation_id, filter, paging)
                    .await
            }
        }
    }

    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError> {
        match self {
            Persistence::Memory(inner) => inner.get_one_by_id(correlation_id, id).await,
            Persistence::PayPal(inner) => inner.get_one_by_id(correlation_id, id).await,
        }
    }

    async fn create(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError> {
        match self {
            Persistence::Memory(inner) => inner.create(correlation_id, card).await,
            Persistence::PayPal(inner) => inner.create(correlation_id, card).await,
        }
    }

    async fn update(
        &self,
        correlation_id: Option<&str>,
        card: CreditCard,
    ) -> Result<CreditCard, RepoError> {
        match self {
            Persistence::Memory(inner) => inner.update(correlation_id, card).await,
            Persistence::PayPal(inner) => inner.update(correlation_id, card).await,
        }
    }

    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &str,
    ) -> Result<Option<CreditCard>, RepoError> {
        match self {
            Persistence::Memory(inner) => inner.delete_by_id(correlation_id, id).await,
            Persistence::PayPal(inner) => inner.delete_by_id(correlation_id, id).await,
        }
    }

    async fn clear(&self, correlation_id: Option<&str>) -> Result<(), RepoError> {
        match self {
            Persistence::Memory(inner) => inner.clear(correlation_id).await,
            Persistence::PayPal(inner) => inner.clear(correlation_id).await,
        }
    }
}
