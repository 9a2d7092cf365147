//! Flat catalog view models handed to page renderers.
//!
//! These are the reshaped forms of the Storefront API payloads: every
//! `edges { node }` connection has already been flattened into a `Vec`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount as the Storefront API reports it.
///
/// The API sends `amount` as a decimal string (`"24.99"`); `Decimal` keeps it
/// exact so cart totals never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency_code: String,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// A purchasable variant of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    /// `None` when the storefront token lacks inventory scope.
    pub quantity_available: Option<i64>,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<Image>,
    pub price: Money,
    /// Pre-sale price; `None` when the variant is not discounted.
    pub compare_at_price: Option<Money>,
}

/// A collection as listed on the collections page and attached to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    pub seo: Seo,
    /// Product type of the collection's first product, used as a category
    /// label. Always `None` for catch-all collections.
    pub product_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub product_type: String,
    pub description: String,
    pub description_html: String,
    pub created_at: Option<DateTime<Utc>>,
    pub total_inventory: Option<i64>,
    pub available_for_sale: bool,
    pub options: Vec<ProductOption>,
    pub featured_image: Option<Image>,
    pub seo: Seo,
    pub images: Vec<Image>,
    pub variants: Vec<ProductVariant>,
    pub collections: Vec<Collection>,
}

/// Whether a product is discounted, and by how much at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleInfo {
    pub is_on_sale: bool,
    /// Largest variant discount in whole percent; `0` when not on sale.
    pub discount_percent: u32,
}

impl Product {
    /// Computes sale state from variant `compare_at_price` vs `price`.
    ///
    /// A variant counts as discounted only when its compare-at price is
    /// strictly greater than its price.
    #[must_use]
    pub fn sale_info(&self) -> SaleInfo {
        let hundred = Decimal::ONE_HUNDRED;
        let max_discount = self
            .variants
            .iter()
            .filter_map(|variant| {
                let compare_at = variant.compare_at_price.as_ref()?.amount;
                let price = variant.price.amount;
                (compare_at > price).then(|| (compare_at - price) / compare_at * hundred)
            })
            .max();

        match max_discount {
            Some(discount) => SaleInfo {
                is_on_sale: true,
                discount_percent: discount
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_u32()
                    .unwrap_or(0),
            },
            None => SaleInfo {
                is_on_sale: false,
                discount_percent: 0,
            },
        }
    }

    /// The lowest variant price, if the product has any variants.
    #[must_use]
    pub fn min_price(&self) -> Option<&Money> {
        self.variants
            .iter()
            .map(|v| &v.price)
            .min_by(|a, b| a.amount.cmp(&b.amount))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopColors {
    pub background: Option<String>,
    pub foreground: Option<String>,
}

/// Store-wide branding used by the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopInfo {
    pub name: String,
    pub primary_domain_url: Option<String>,
    pub logo: Option<Image>,
    pub primary_colors: Vec<ShopColors>,
    pub secondary_colors: Vec<ShopColors>,
}

/// Facet values collected by walking the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMeta {
    pub brands: Vec<String>,
    pub types: Vec<String>,
    /// Option name to sorted, de-duplicated values.
    pub options: BTreeMap<String, Vec<String>>,
}
