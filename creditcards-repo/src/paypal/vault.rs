//! Outbound port for the PayPal credit card vault.
//!
//! The persistence adapter talks to the vault only through these traits so a
//! substitute backend can be injected in tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use creditcards_types::{Address, Credential, CreditCardState, CreditCardType, RepoError};

/// Which PayPal environment to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultMode {
    Sandbox,
    Live,
}

impl VaultMode {
    pub fn from_sandbox(sandbox: bool) -> Self {
        if sandbox {
            VaultMode::Sandbox
        } else {
            VaultMode::Live
        }
    }

    /// REST API root for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            VaultMode::Sandbox => "https://api.sandbox.paypal.com",
            VaultMode::Live => "https://api.paypal.com",
        }
    }
}

impl std::fmt::Display for VaultMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultMode::Sandbox => write!(f, "sandbox"),
            VaultMode::Live => write!(f, "live"),
        }
    }
}

/// A credit card as the vault stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCreditCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CreditCardType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Free-form merchant token; carries the packed card fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_card_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CreditCardState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<serde_json::Value>>,
}

/// Options for one vault listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultListOptions {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub external_customer_id: Option<String>,
}

/// One page of a vault listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPage {
    #[serde(default)]
    pub items: Vec<VaultCreditCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

/// Errors returned by a vault backend.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Credit card not found in vault")]
    NotFound,

    #[error("Vault API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl From<VaultError> for RepoError {
    fn from(err: VaultError) -> Self {
        RepoError::backend(err)
    }
}

/// The four vault operations the adapter relies on.
#[async_trait]
pub trait CreditCardVault: Send + Sync {
    async fn list(&self, options: VaultListOptions) -> Result<VaultPage, VaultError>;

    /// Fails with [`VaultError::NotFound`] when the card does not exist.
    async fn get(&self, id: &str) -> Result<VaultCreditCard, VaultError>;

    async fn create(&self, card: VaultCreditCard) -> Result<VaultCreditCard, VaultError>;

    async fn delete(&self, id: &str) -> Result<(), VaultError>;
}

/// Builds a vault client once credentials are known.
pub trait VaultConnector: Send + Sync {
    fn connect(
        &self,
        mode: VaultMode,
        credential: &Credential,
    ) -> Result<Arc<dyn CreditCardVault>, VaultError>;
}
