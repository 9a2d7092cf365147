//! Customer account view models: profile, saved addresses and order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Money, ProductVariant};

/// A signed-in customer with addresses and orders already flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub default_address: Option<MailingAddress>,
    pub addresses: Vec<MailingAddress>,
    pub orders: Vec<Order>,
}

impl Customer {
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Finds an order by the number shown to the customer, e.g. `"1001"`.
    #[must_use]
    pub fn order(&self, number: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|order| order.order_number.to_string() == number.trim())
    }

    #[must_use]
    pub fn is_default_address(&self, address_id: &str) -> bool {
        self.default_address
            .as_ref()
            .is_some_and(|address| address.id == address_id)
    }
}

/// Profile fields echoed back by account mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub accepts_marketing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingAddress {
    pub id: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A customer access token, as issued on sign-in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CustomerAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerAccessToken")
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: i64,
    pub processed_at: Option<DateTime<Utc>>,
    pub financial_status: Option<String>,
    /// Order status page on the shop's own domain.
    pub customer_url: Option<String>,
    pub subtotal: Option<Money>,
    pub total: Money,
    pub shipping: Option<Money>,
    pub tax: Option<Money>,
    pub line_items: Vec<OrderLineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub title: String,
    pub quantity: i64,
    pub discounted_total: Money,
    /// `None` once the variant has been deleted from the catalog.
    pub variant: Option<ProductVariant>,
}
