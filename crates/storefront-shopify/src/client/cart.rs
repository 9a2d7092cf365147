//! Cart reads and mutations.

use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront_core::Cart;

use crate::error::StorefrontError;
use crate::queries;
use crate::reshape::reshape_cart;
use crate::types::{ShopifyCart, UserError};

use super::StorefrontClient;

/// A variant and quantity to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: i64,
}

/// A new quantity for an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: String,
    pub merchandise_id: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
struct CartData {
    cart: Option<ShopifyCart>,
}

/// Payload shared by every cart mutation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartPayload {
    cart: Option<ShopifyCart>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

impl CartPayload {
    /// The mutated cart, or the first user error when the API returned none.
    fn into_cart(self, operation: &str) -> Result<Cart, StorefrontError> {
        if let Some(cart) = self.cart {
            if !self.user_errors.is_empty() {
                tracing::warn!(operation, errors = ?self.user_errors, "cart mutation reported user errors");
            }
            return Ok(reshape_cart(cart));
        }
        let message = self
            .user_errors
            .into_iter()
            .next()
            .map_or_else(|| "no cart returned".to_owned(), |e| e.message);
        tracing::error!(operation, %message, "cart mutation rejected");
        Err(StorefrontError::UserErrors {
            operation: operation.to_owned(),
            message,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    cart_create: CartPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddData {
    cart_lines_add: CartPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateData {
    cart_lines_update: CartPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveData {
    cart_lines_remove: CartPayload,
}

impl StorefrontClient {
    /// Fetches a cart, or `None` once it has been checked out or has expired.
    ///
    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>, StorefrontError> {
        let data: CartData = self
            .request("getCart", queries::GET_CART, json!({ "cartId": cart_id }))
            .await?;
        if data.cart.is_none() {
            tracing::warn!(cart_id, "cart has been ordered or is no longer valid");
        }
        Ok(data.cart.map(reshape_cart))
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the API refuses the lines.
    pub async fn create_cart(&self, lines: &[CartLineInput]) -> Result<Cart, StorefrontError> {
        let data: CreateData = self
            .request("createCart", queries::CREATE_CART, json!({ "lines": lines }))
            .await?;
        let cart = data.cart_create.into_cart("createCart")?;
        tracing::info!(cart_id = %cart.id, "cart created");
        Ok(cart)
    }

    /// Adds lines to `cart_id`, or creates a cart holding them when there is
    /// no cart yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the API refuses the lines.
    pub async fn add_to_cart(
        &self,
        cart_id: Option<&str>,
        lines: &[CartLineInput],
    ) -> Result<Cart, StorefrontError> {
        let Some(cart_id) = cart_id else {
            tracing::info!("no cart id; creating a new cart");
            return self.create_cart(lines).await;
        };
        let data: AddData = self
            .request(
                "addToCart",
                queries::ADD_TO_CART,
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        data.cart_lines_add.into_cart("addToCart")
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the API refuses the update.
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: &[CartLineUpdateInput],
    ) -> Result<Cart, StorefrontError> {
        let data: UpdateData = self
            .request(
                "updateCart",
                queries::EDIT_CART_ITEMS,
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        data.cart_lines_update.into_cart("updateCart")
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::UserErrors`] when the API refuses the removal.
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: &[String],
    ) -> Result<Cart, StorefrontError> {
        let data: RemoveData = self
            .request(
                "removeFromCart",
                queries::REMOVE_FROM_CART,
                json!({ "cartId": cart_id, "lineIds": line_ids }),
            )
            .await?;
        data.cart_lines_remove.into_cart("removeFromCart")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_inputs_serialize_camel_case() {
        let json = serde_json::to_value(CartLineUpdateInput {
            id: "gid://shopify/CartLine/1".to_owned(),
            merchandise_id: "gid://shopify/ProductVariant/2".to_owned(),
            quantity: 4,
        })
        .expect("serialize");
        assert_eq!(
            json,
            json!({
                "id": "gid://shopify/CartLine/1",
                "merchandiseId": "gid://shopify/ProductVariant/2",
                "quantity": 4
            })
        );
    }

    #[test]
    fn payload_without_cart_surfaces_first_user_error() {
        let payload: CartPayload = serde_json::from_value(json!({
            "cart": null,
            "userErrors": [
                {"field": ["lines", "0", "merchandiseId"], "message": "Merchandise not found"},
                {"field": null, "message": "second"}
            ]
        }))
        .expect("payload");
        let err = payload.into_cart("addToCart").unwrap_err();
        assert!(
            matches!(&err, StorefrontError::UserErrors { message, .. } if message == "Merchandise not found"),
            "got: {err:?}"
        );
    }

    #[test]
    fn payload_without_cart_or_errors_is_still_an_error() {
        let payload: CartPayload =
            serde_json::from_value(json!({"cart": null, "userErrors": []})).expect("payload");
        assert!(matches!(
            payload.into_cart("createCart"),
            Err(StorefrontError::UserErrors { .. })
        ));
    }
}
