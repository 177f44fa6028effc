//! Translation between [`CreditCard`] and [`VaultCreditCard`].
//!
//! The vault has no fields for the card number in clear, the display name,
//! the ccv or the saved/default flags. They travel packed into
//! `external_card_id` as `number;name;ccv;saved;default`.

use creditcards_types::CreditCard;

use super::vault::VaultCreditCard;

pub const TOKEN_DELIMITER: char = ';';

const SAVED_MARKER: &str = "saved";
const DEFAULT_MARKER: &str = "default";

/// Converts a vault card into the canonical record.
pub fn to_public(value: VaultCreditCard) -> CreditCard {
    let token = value.external_card_id.unwrap_or_default();
    let mut parts = token.split(TOKEN_DELIMITER);

    let number = parts.next().unwrap_or_default().to_string();
    let name = parts.next().unwrap_or_default().to_string();
    let ccv = parts.next().unwrap_or_default().to_string();
    let saved = parts.next() == Some(SAVED_MARKER);
    let default = parts.next() == Some(DEFAULT_MARKER);

    CreditCard {
        id: value.id,
        customer_id: value.external_customer_id,
        card_type: value.card_type,
        number,
        expire_month: value.expire_month,
        expire_year: value.expire_year,
        first_name: value.first_name,
        last_name: value.last_name,
        billing_address: value.billing_address,
        name,
        ccv,
        saved,
        default,
        state: value.state,
    }
}

/// Converts a canonical record into a vault payload.
///
/// `id` and `state` are owned by the vault and never sent.
pub fn from_public(value: &CreditCard) -> VaultCreditCard {
    VaultCreditCard {
        number: Some(value.number.clone()),
        card_type: value.card_type,
        expire_month: value.expire_month,
        expire_year: value.expire_year,
        first_name: value.first_name.clone(),
        last_name: value.last_name.clone(),
        billing_address: value.billing_address.clone(),
        external_customer_id: value.customer_id.clone(),
        external_card_id: Some(encode_token(value)),
        ..Default::default()
    }
}

/// Packs the fields the vault cannot hold into one token.
pub fn encode_token(value: &CreditCard) -> String {
    let name = value.name.replace(TOKEN_DELIMITER, "_");
    let ccv = value.ccv.replace(TOKEN_DELIMITER, "");
    let saved = if value.saved { SAVED_MARKER } else { "" };
    let default = if value.default { DEFAULT_MARKER } else { "" };

    [value.number.as_str(), name.as_str(), ccv.as_str(), saved, default]
        .join(&TOKEN_DELIMITER.to_string())
}
