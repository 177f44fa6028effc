//! Query types: filter, paging window and result page.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::credit_card::{CreditCard, CreditCardState};

/// Default number of records skipped when paging does not say otherwise.
pub const DEFAULT_SKIP: usize = 0;
/// Default number of records returned when paging does not say otherwise.
pub const DEFAULT_TAKE: usize = 100;

/// Filter for credit card listings.
///
/// Every predicate is optional. `customer_id` is applied by the store itself
/// (see [`CreditCardFilter::matches`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CreditCardState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
    /// Accepts a list of ids or a comma-delimited string.
    #[serde(
        default,
        deserialize_with = "deserialize_ids",
        skip_serializing_if = "Option::is_none"
    )]
    pub ids: Option<BTreeSet<String>>,
}

impl CreditCardFilter {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_state(mut self, state: CreditCardState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = Some(saved);
        self
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// The customer id to push down to the store, if any.
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref().filter(|s| !s.is_empty())
    }

    /// Checks the record-level predicates: `id`, `state`, `saved` and `ids`.
    ///
    /// `customer_id` is not checked here; stores narrow by customer before
    /// records reach this point.
    pub fn matches(&self, card: &CreditCard) -> bool {
        if let Some(id) = &self.id {
            if card.id.as_ref() != Some(id) {
                return false;
            }
        }
        if let Some(state) = self.state {
            if card.state != Some(state) {
                return false;
            }
        }
        if let Some(saved) = self.saved {
            if card.saved != saved {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            match &card.id {
                Some(id) if ids.contains(id) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Normalizes an `ids` filter value into a set.
///
/// A string is split on commas and an array contributes its string elements.
/// Anything else means "no id filter".
pub fn parse_ids(value: &serde_json::Value) -> Option<BTreeSet<String>> {
    match value {
        serde_json::Value::String(s) => Some(s.split(',').map(str::to_string).collect()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

fn deserialize_ids<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_ids))
}

/// Skip/take window over a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<usize>,
    /// Whether the caller asked for a total count.
    #[serde(default)]
    pub total: bool,
}

impl PagingParams {
    pub fn new(skip: usize, take: usize) -> Self {
        Self {
            skip: Some(skip),
            take: Some(take),
            total: false,
        }
    }

    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(DEFAULT_SKIP)
    }

    pub fn take(&self) -> usize {
        self.take.unwrap_or(DEFAULT_TAKE)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> DataPage<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data, total: None }
    }

    pub fn with_total(data: Vec<T>, total: usize) -> Self {
        Self {
            data,
            total: Some(total),
        }
    }
}
