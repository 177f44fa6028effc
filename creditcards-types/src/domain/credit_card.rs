//! Credit card domain model.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Card brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditCardType {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Maestro,
}

impl std::fmt::Display for CreditCardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CreditCardType::Visa => "visa",
            CreditCardType::Mastercard => "mastercard",
            CreditCardType::Amex => "amex",
            CreditCardType::Discover => "discover",
            CreditCardType::Maestro => "maestro",
        };
        write!(f, "{}", s)
    }
}

/// Lifecycle status of a stored card, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditCardState {
    Ok,
    Expired,
}

impl CreditCardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditCardState::Ok => "ok",
            CreditCardState::Expired => "expired",
        }
    }
}

impl std::fmt::Display for CreditCardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address attached to a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, alias = "zip", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A credit card record, independent of where it is stored.
///
/// `number`, `name` and `ccv` together with the `saved` and `default` flags
/// are not first-class fields in every backend; adapters may pack them into a
/// single opaque field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    /// Backend-assigned identifier. Ignored on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CreditCardType>,
    #[serde(default)]
    pub number: String,
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

    /// Cardholder display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ccv: String,

    /// Kept for reuse beyond a single transaction
    #[serde(default)]
    pub saved: bool,
    /// The customer's default card
    #[serde(default)]
    pub default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CreditCardState>,
}

impl CreditCard {
    /// Returns the owning customer, failing when it is missing or blank.
    pub fn require_customer_id(&self) -> Result<&str, DomainError> {
        match self.customer_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(DomainError::ValidationError(
                "Credit card customer_id cannot be empty".into(),
            )),
        }
    }

    /// Returns the card id, failing when it is missing or blank.
    pub fn require_id(&self) -> Result<&str, DomainError> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(DomainError::ValidationError(
                "Credit card id cannot be empty".into(),
            )),
        }
    }
}
