//! Cart UI state as an explicit value.
//!
//! Renderers receive a `CartState` instead of reaching into process-wide
//! state, so optimistic line edits can be computed and tested in isolation.
//! The upstream cart stays authoritative: callers replace the local copy with
//! [`CartState::set_cart`] once the API answers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub cart: Option<Cart>,
    pub loading: bool,
    pub error: Option<String>,
    pub is_open: bool,
}

impl CartState {
    #[must_use]
    pub fn new(cart: Option<Cart>) -> Self {
        Self {
            cart,
            ..Self::default()
        }
    }

    pub fn set_cart(&mut self, cart: Cart) {
        self.cart = Some(cart);
        self.error = None;
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Sets a line's quantity and recomputes its total and the cart totals.
    ///
    /// No-op when there is no cart or no line with `line_id`.
    pub fn update_line(&mut self, line_id: &str, quantity: i64) {
        let Some(cart) = self.cart.as_mut() else {
            return;
        };
        let Some(line) = cart.lines.iter_mut().find(|l| l.id == line_id) else {
            return;
        };

        line.quantity = quantity;
        line.cost.total_amount.amount =
            (Decimal::from(quantity) * line.cost.amount_per_quantity.amount).round_dp(2);
        recompute_totals(cart);
    }

    /// Drops a line and recomputes the cart totals.
    pub fn remove_line(&mut self, line_id: &str) {
        let Some(cart) = self.cart.as_mut() else {
            return;
        };
        let before = cart.lines.len();
        cart.lines.retain(|l| l.id != line_id);
        if cart.lines.len() != before {
            recompute_totals(cart);
        }
    }
}

fn recompute_totals(cart: &mut Cart) {
    let subtotal: Decimal = cart
        .lines
        .iter()
        .map(|l| l.cost.total_amount.amount)
        .sum::<Decimal>()
        .round_dp(2);
    let tax = cart
        .cost
        .total_tax_amount
        .as_ref()
        .map_or(Decimal::ZERO, |m| m.amount);

    cart.total_quantity = cart.lines.iter().map(|l| l.quantity).sum();
    cart.cost.subtotal_amount.amount = subtotal;
    cart.cost.total_amount.amount = (subtotal + tax).round_dp(2);
}
