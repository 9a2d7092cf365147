//! Cart endpoints. The cart id travels in the `x-cart-id` header both ways.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use storefront_core::Cart;
use storefront_shopify::{CartLineInput, CartLineUpdateInput};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState, CART_ID_HEADER};

#[derive(Debug, Deserialize)]
pub(super) struct AddToCartRequest {
    pub variant_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct EditCartRequest {
    pub merchandise_id: String,
    /// `0` removes the line.
    pub quantity: i64,
}

fn cart_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CART_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn cart_response(cart: Cart, request_id: String) -> Response {
    let header = HeaderValue::from_str(&cart.id);
    let mut response = Json(ApiResponse::new(cart, request_id)).into_response();
    match header {
        Ok(value) => {
            response.headers_mut().insert(CART_ID_HEADER, value);
        }
        Err(e) => tracing::warn!(error = %e, "cart id is not a valid header value"),
    }
    response
}

/// GET /api/v1/cart: `data` is `null` when there is no live cart.
pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Option<Cart>>>, ApiError> {
    let Some(id) = cart_id(&headers) else {
        return Ok(Json(ApiResponse::new(None, req_id.0)));
    };
    let cart = state
        .client
        .get_cart(id)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(cart, req_id.0)))
}

/// POST /api/v1/cart/add: adds a variant, creating the cart on first use.
pub(super) async fn add_to_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<AddToCartRequest>,
) -> Result<Response, ApiError> {
    if body.variant_id.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "variant_id must not be empty",
        ));
    }
    if body.quantity < 1 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "quantity must be at least 1",
        ));
    }

    let lines = [CartLineInput {
        merchandise_id: body.variant_id,
        quantity: body.quantity,
    }];
    let cart = state
        .client
        .add_to_cart(cart_id(&headers), &lines)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(cart_response(cart, req_id.0))
}

/// POST /api/v1/cart/edit: sets the quantity of the line holding a variant.
pub(super) async fn edit_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<EditCartRequest>,
) -> Result<Response, ApiError> {
    if body.quantity < 0 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "quantity must not be negative",
        ));
    }
    let Some(id) = cart_id(&headers) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "x-cart-id header is required",
        ));
    };

    let cart = state
        .client
        .get_cart(id)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "cart not found"))?;
    let Some(line) = cart.line_for_merchandise(&body.merchandise_id) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no cart line for {}", body.merchandise_id),
        ));
    };

    let result = if body.quantity == 0 {
        state
            .client
            .remove_from_cart(id, &[line.id.clone()])
            .await
    } else {
        let update = [CartLineUpdateInput {
            id: line.id.clone(),
            merchandise_id: body.merchandise_id.clone(),
            quantity: body.quantity,
        }];
        state.client.update_cart(id, &update).await
    };
    let updated = result.map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    Ok(cart_response(updated, req_id.0))
}
