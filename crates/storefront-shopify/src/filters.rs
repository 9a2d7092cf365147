//! Translation of query-string filter state into Storefront API filters.
//!
//! The API advertises the facets available for a catalog scope as
//! [`FilterDescriptor`]s. Each value carries an `input`: a JSON string holding
//! the exact `ProductFilter` object to send back when that value is selected.
//! [`parse_filters`] matches the current query parameters against those
//! descriptors and decodes the inputs of the selected values.
//!
//! Predicates are only ever built from descriptors the API currently
//! advertises. A query parameter naming a facet or value that no longer
//! exists (e.g. a bookmarked URL after the catalog changed) contributes
//! nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::params::{is_reserved_key, QueryParams, PRICE_KEY};

/// Label the API uses for the price facet.
pub const PRICE_LABEL: &str = "Price";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    List,
    PriceRange,
    Boolean,
    #[serde(other)]
    Unknown,
}

/// A facet advertised by the API, e.g. `"Brand"` with its value options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: Option<FilterType>,
    #[serde(default)]
    pub values: Vec<FilterValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValue {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub count: u64,
    /// Serialized `ProductFilter` JSON, opaque until selected.
    pub input: String,
}

impl FilterDescriptor {
    /// The price facet is matched by its `PRICE_RANGE` type or, for payloads
    /// that omit the type, by its `"Price"` label.
    #[must_use]
    pub fn is_price(&self) -> bool {
        self.kind == Some(FilterType::PriceRange) || self.label == PRICE_LABEL
    }

    /// Values of this facet whose labels are selected in `params`, in the
    /// order the API lists them.
    ///
    /// Always empty for the price facet and for facets whose label collides
    /// with a reserved query key.
    pub fn selected_values<'a>(
        &'a self,
        params: &'a QueryParams,
    ) -> impl Iterator<Item = &'a FilterValue> + 'a {
        let readable = !self.is_price() && !is_reserved_key(&self.label);
        self.values
            .iter()
            .filter(move |value| readable && params.contains(&self.label, &value.label))
    }
}

/// A single filter condition in the shape the Storefront API accepts.
///
/// Serializes externally tagged, so `ProductVendor("Nike")` becomes
/// `{"productVendor":"Nike"}`. Any other object the API advertises, such as
/// `{"category":{"id":"..."}}`, is kept verbatim in [`Self::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiFilterPredicate {
    Available(bool),
    Price(PriceRange),
    ProductType(String),
    ProductVendor(String),
    Tag(String),
    ProductMetafield(MetafieldFilter),
    VariantMetafield(MetafieldFilter),
    VariantOption(VariantOptionFilter),
    #[serde(untagged)]
    Other(Map<String, Value>),
}

/// Why a value's `input` could not be used as a predicate.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input is not a non-empty JSON object")]
    NotAnObject,
}

impl ApiFilterPredicate {
    /// Decodes an advertised `input` string.
    ///
    /// A typed variant is used only when it re-serializes to exactly the
    /// advertised object; anything else becomes [`Self::Other`] so no field
    /// is lost on the way back to the API.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for unparseable JSON and for JSON that is not a
    /// non-empty object.
    pub fn from_input(input: &str) -> Result<Self, InputError> {
        let raw: Value = serde_json::from_str(input)?;
        let Value::Object(object) = raw else {
            return Err(InputError::NotAnObject);
        };
        if object.is_empty() {
            return Err(InputError::NotAnObject);
        }
        let advertised = Value::Object(object.clone());
        let lossless = serde_json::from_value::<Self>(advertised.clone())
            .ok()
            .filter(|typed| serde_json::to_value(typed).ok().as_ref() == Some(&advertised));
        Ok(lossless.unwrap_or(Self::Other(object)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldFilter {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOptionFilter {
    pub name: String,
    pub value: String,
}

/// Builds the API filter list for the current query parameters.
///
/// Walks `available` in order. For a regular facet, every value whose label
/// appears under the facet's label in `params` has its `input` decoded and
/// appended; an input that is not a JSON object is logged and skipped on its
/// own. For the price facet, `price=min,max` becomes one price
/// predicate when both bounds parse as finite numbers, and nothing otherwise.
///
/// Output order is descriptor order, then value order.
#[must_use]
pub fn parse_filters(params: &QueryParams, available: &[FilterDescriptor]) -> Vec<ApiFilterPredicate> {
    let mut predicates = Vec::new();

    for descriptor in available {
        if descriptor.is_price() {
            if let Some(range) = params.get(PRICE_KEY).and_then(parse_price_range) {
                predicates.push(ApiFilterPredicate::Price(range));
            } else if let Some(raw) = params.get(PRICE_KEY) {
                tracing::debug!(price = raw, "ignoring unparseable price range");
            }
            continue;
        }

        for value in descriptor.selected_values(params) {
            match ApiFilterPredicate::from_input(&value.input) {
                Ok(predicate) => predicates.push(predicate),
                Err(e) => tracing::warn!(
                    filter = %descriptor.label,
                    value = %value.label,
                    input = %value.input,
                    error = %e,
                    "skipping filter value with unusable input"
                ),
            }
        }
    }

    predicates
}

/// Parses a `"min,max"` price parameter.
///
/// Both bounds are required and must be finite; surrounding whitespace is
/// ignored.
#[must_use]
pub fn parse_price_range(raw: &str) -> Option<PriceRange> {
    let (min, max) = raw.split_once(',')?;
    let min = parse_bound(min)?;
    let max = parse_bound(max)?;
    Some(PriceRange {
        min: Some(min),
        max: Some(max),
    })
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
