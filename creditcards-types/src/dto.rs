//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{CreditCard, CreditCardFilter, PagingParams};

/// Request to list credit cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetCreditCardsRequest {
    #[serde(default)]
    pub filter: CreditCardFilter,
    #[serde(default)]
    pub paging: PagingParams,
}

/// Request addressing a single card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardIdRequest {
    pub card_id: String,
    /// Owning customer, accepted for routing symmetry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Request carrying a full card (create and update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardRequest {
    pub card: CreditCard,
}
