//! Storefront API response types, as they arrive on the wire.
//!
//! Field names follow the GraphQL schema (`camelCase`). Lists come wrapped in
//! [`Connection`]s and are flattened by [`crate::reshape`] before anything is
//! rendered.
//!
//! ## Observed shape
//!
//! ### Money
//! `amount` is a decimal **string** (`"24.99"`), never a JSON number.
//!
//! ### `compareAtPrice`
//! Explicitly `null` when the variant is not discounted.
//!
//! ### `quantityAvailable` / `totalInventory`
//! `null` unless the storefront token has the
//! `unauthenticated_read_product_inventory` scope.
//!
//! ### `cart`
//! `null` once a cart has been checked out or has expired.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filters::FilterDescriptor;

/// Cursor-based list wrapper used by every paginated field.
///
/// `edges` entries and their `node`s are modelled as optional so a partially
/// malformed payload still deserializes; see
/// [`crate::connection::remove_edges_and_nodes`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Option<Edge<T>>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: None,
        }
    }
}

impl<T> Connection<T> {
    /// Wraps plain nodes into a connection, one edge per node.
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = T>) -> Self {
        Self {
            edges: nodes
                .into_iter()
                .map(|node| {
                    Some(Edge {
                        node: Some(node),
                        cursor: None,
                    })
                })
                .collect(),
            page_info: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge<T> {
    // A path default keeps serde from adding a `T: Default` bound.
    #[serde(default = "Option::default")]
    pub node: Option<T>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyMoney {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShopifySeo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifySelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyVariant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub quantity_available: Option<i64>,
    /// Defaults to `true` when the field is not selected in the query.
    #[serde(default = "default_available")]
    pub available_for_sale: bool,
    #[serde(default)]
    pub selected_options: Vec<ShopifySelectedOption>,
    #[serde(default)]
    pub image: Option<ShopifyImage>,
    pub price: ShopifyMoney,
    #[serde(default)]
    pub compare_at_price: Option<ShopifyMoney>,
}

/// Only the field the collection fragment selects from a collection's products.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeNode {
    #[serde(default)]
    pub product_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShopifyCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<ShopifyImage>,
    #[serde(default)]
    pub seo: ShopifySeo,
    #[serde(default)]
    pub products: Option<Connection<ProductTypeNode>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_inventory: Option<i64>,
    #[serde(default)]
    pub available_for_sale: bool,
    #[serde(default)]
    pub options: Vec<ShopifyProductOption>,
    #[serde(default)]
    pub featured_image: Option<ShopifyImage>,
    #[serde(default)]
    pub seo: ShopifySeo,
    #[serde(default)]
    pub images: Connection<ShopifyImage>,
    #[serde(default)]
    pub variants: Connection<ShopifyVariant>,
    #[serde(default)]
    pub collections: Option<Connection<ShopifyCollection>>,
}

/// A page of products plus the facets the API advertises for it.
///
/// Collection listings report facets under `filters`; search reports them
/// under `productFilters` together with `totalCount`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub connection: Connection<ShopifyProduct>,
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub product_filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub total_count: Option<i64>,
}

/// Facet fields selected by the catalog-wide metadata walk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetaNode {
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub options: Vec<ShopifyProductOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCart {
    pub id: String,
    pub checkout_url: String,
    #[serde(default)]
    pub total_quantity: i64,
    pub cost: ShopifyCartCost,
    #[serde(default)]
    pub lines: Connection<ShopifyCartLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartCost {
    pub subtotal_amount: ShopifyMoney,
    pub total_amount: ShopifyMoney,
    #[serde(default)]
    pub total_tax_amount: Option<ShopifyMoney>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyCartLine {
    pub id: String,
    pub quantity: i64,
    pub cost: ShopifyCartLineCost,
    pub merchandise: ShopifyMerchandise,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartLineCost {
    pub total_amount: ShopifyMoney,
    pub amount_per_quantity: ShopifyMoney,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyMerchandise {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selected_options: Vec<ShopifySelectedOption>,
    pub product: ShopifyCartProduct,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<ShopifyImage>,
}

/// Validation failure reported inside a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    /// Only customer mutations report a code, e.g. `"UNIDENTIFIED_CUSTOMER"`.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyShop {
    pub name: String,
    #[serde(default)]
    pub brand: Option<ShopifyBrand>,
    #[serde(default)]
    pub primary_domain: Option<ShopifyDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyBrand {
    #[serde(default)]
    pub colors: Option<ShopifyBrandColors>,
    #[serde(default)]
    pub logo: Option<ShopifyMediaImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShopifyBrandColors {
    #[serde(default)]
    pub primary: Vec<ShopifyColorPair>,
    #[serde(default)]
    pub secondary: Vec<ShopifyColorPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyColorPair {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyMediaImage {
    #[serde(default)]
    pub image: Option<ShopifyImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyDomain {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyMailingAddress {
    pub id: String,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub default_address: Option<ShopifyMailingAddress>,
    #[serde(default)]
    pub addresses: Connection<ShopifyMailingAddress>,
    #[serde(default)]
    pub orders: Connection<ShopifyOrder>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyOrder {
    pub order_number: i64,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub customer_url: Option<String>,
    #[serde(default)]
    pub current_subtotal_price: Option<ShopifyMoney>,
    pub current_total_price: ShopifyMoney,
    #[serde(default)]
    pub current_total_shipping_price: Option<ShopifyMoney>,
    #[serde(default)]
    pub current_total_tax: Option<ShopifyMoney>,
    #[serde(default)]
    pub line_items: Connection<ShopifyOrderLineItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyOrderLineItem {
    pub title: String,
    #[serde(default)]
    pub current_quantity: i64,
    pub discounted_total_price: ShopifyMoney,
    #[serde(default)]
    pub variant: Option<ShopifyVariant>,
}

/// Profile fields selected by the account mutations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCustomerProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub accepts_marketing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyAccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyMenu {
    #[serde(default)]
    pub items: Vec<ShopifyMenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyMenuItem {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<ShopifyMenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyPage {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_summary: String,
    #[serde(default)]
    pub seo: ShopifySeo,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyMetaobject {
    pub handle: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<ShopifyMetaobjectField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopifyMetaobjectField {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Only media-image references select fields, so other references
    /// arrive as an empty object.
    #[serde(default)]
    pub reference: Option<ShopifyMediaImage>,
}

/// Default value for `ShopifyVariant::available_for_sale` when the field is absent.
fn default_available() -> bool {
    true
}
