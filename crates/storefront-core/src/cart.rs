use serde::{Deserialize, Serialize};

use crate::catalog::{Image, Money, SelectedOption};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: CartCost,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    /// Absent until the buyer's address is known.
    pub total_tax_amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: i64,
    pub cost: CartLineCost,
    pub merchandise: CartMerchandise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineCost {
    pub total_amount: Money,
    pub amount_per_quantity: Money,
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    pub id: String,
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub product: CartProduct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<Image>,
}

impl Cart {
    /// Finds the line holding the given variant.
    #[must_use]
    pub fn line_for_merchandise(&self, merchandise_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.merchandise.id == merchandise_id)
    }
}
