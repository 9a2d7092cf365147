//! Customer account endpoints. The access token issued at sign-in travels in
//! the `x-customer-token` header, the same way [`super::CART_ID_HEADER`]
//! carries the cart id.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_core::{Customer, CustomerAccessToken, CustomerProfile, MailingAddress, Order};
use storefront_shopify::{AddressInput, Credentials, NewCustomer};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState, CUSTOMER_TOKEN_HEADER};

#[derive(Debug, Deserialize)]
pub(super) struct RecoverRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedAddress {
    pub deleted_id: String,
}

fn customer_token<'a>(headers: &'a HeaderMap, req_id: &RequestId) -> Result<&'a str, ApiError> {
    headers
        .get(CUSTOMER_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "unauthorized",
                "x-customer-token header is required",
            )
        })
}

fn require(req_id: &RequestId, field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

/// POST /api/v1/account/register
pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NewCustomer>,
) -> Result<Json<ApiResponse<CustomerProfile>>, ApiError> {
    require(&req_id, "email", &body.email)?;
    require(&req_id, "password", &body.password)?;
    let profile = state
        .client
        .create_customer(&body)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(profile, req_id.0)))
}

/// POST /api/v1/account/login: returns the token and echoes it in
/// `x-customer-token`.
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<Credentials>,
) -> Result<Response, ApiError> {
    require(&req_id, "email", &body.email)?;
    require(&req_id, "password", &body.password)?;
    let token: CustomerAccessToken = state
        .client
        .create_access_token(&body)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let header = HeaderValue::from_str(&token.access_token);
    let mut response = Json(ApiResponse::new(token, req_id.0)).into_response();
    match header {
        Ok(value) => {
            response.headers_mut().insert(CUSTOMER_TOKEN_HEADER, value);
        }
        Err(e) => tracing::warn!(error = %e, "access token is not a valid header value"),
    }
    Ok(response)
}

/// POST /api/v1/account/recover
pub(super) async fn recover(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RecoverRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require(&req_id, "email", &body.email)?;
    state
        .client
        .recover_customer(body.email.trim())
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new((), req_id.0)))
}

async fn load_customer(
    state: &AppState,
    req_id: &RequestId,
    headers: &HeaderMap,
) -> Result<Customer, ApiError> {
    let token = customer_token(headers, req_id)?;
    state
        .client
        .get_customer(token)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))
}

/// GET /api/v1/account
pub(super) async fn get_account(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Customer>>, ApiError> {
    let customer = load_customer(&state, &req_id, &headers).await?;
    Ok(Json(ApiResponse::new(customer, req_id.0)))
}

/// GET /api/v1/account/orders/{number}
pub(super) async fn get_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(number): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let customer = load_customer(&state, &req_id, &headers).await?;
    let Some(order) = customer.order(&number).cloned() else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("order {number} not found"),
        ));
    };
    Ok(Json(ApiResponse::new(order, req_id.0)))
}

/// POST /api/v1/account/addresses
pub(super) async fn create_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<AddressInput>,
) -> Result<Json<ApiResponse<MailingAddress>>, ApiError> {
    let token = customer_token(&headers, &req_id)?;
    let address = state
        .client
        .create_address(token, &body)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(address, req_id.0)))
}

/// PUT /api/v1/account/addresses/{id}
pub(super) async fn update_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<AddressInput>,
) -> Result<Json<ApiResponse<MailingAddress>>, ApiError> {
    let token = customer_token(&headers, &req_id)?;
    let address = state
        .client
        .update_address(token, &id, &body)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(address, req_id.0)))
}

/// DELETE /api/v1/account/addresses/{id}
pub(super) async fn delete_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<DeletedAddress>>, ApiError> {
    let token = customer_token(&headers, &req_id)?;
    let deleted_id = state
        .client
        .delete_address(token, &id)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(DeletedAddress { deleted_id }, req_id.0)))
}

/// POST /api/v1/account/addresses/{id}/default
pub(super) async fn set_default_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Option<MailingAddress>>>, ApiError> {
    let token = customer_token(&headers, &req_id)?;
    let address = state
        .client
        .set_default_address(token, &id)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(address, req_id.0)))
}
