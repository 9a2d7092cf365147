mod account;
mod cart;
mod collections;
mod content;
mod listing;
mod product;
mod products;
mod search;
mod shop;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_shopify::{StorefrontClient, StorefrontError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

/// Header carrying the cart id between the browser and the server.
pub(crate) const CART_ID_HEADER: &str = "x-cart-id";

/// Header carrying the customer access token issued at sign-in.
pub(crate) const CUSTOMER_TOKEN_HEADER: &str = "x-customer-token";

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<StorefrontClient>,
    /// Public origin, used for absolute links such as canonical URLs.
    pub base_url: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_storefront_error(request_id: String, error: &StorefrontError) -> ApiError {
    match error {
        StorefrontError::NotFound { resource } => {
            tracing::info!(%resource, "resource not found");
            ApiError::new(request_id, "not_found", format!("{resource} not found"))
        }
        StorefrontError::UserErrors { message, .. } => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        StorefrontError::InvalidCustomerToken { operation } => {
            tracing::info!(%operation, "customer access token rejected");
            ApiError::new(request_id, "unauthorized", "sign in again")
        }
        StorefrontError::RateLimited { .. } => {
            tracing::warn!(error = %error, "storefront api rate limit exhausted");
            ApiError::new(request_id, "upstream_error", "store is busy, try again shortly")
        }
        _ => {
            tracing::error!(error = %error, "storefront request failed");
            ApiError::new(request_id, "upstream_error", "store request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    let cart_id = HeaderName::from_static(CART_ID_HEADER);
    let customer_token = HeaderName::from_static(CUSTOMER_TOKEN_HEADER);
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
            cart_id.clone(),
            customer_token.clone(),
        ])
        .expose_headers([cart_id, customer_token, header::RETRY_AFTER])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/{handle}", get(product::get_product))
        .route("/api/v1/search", get(search::search_products))
        .route("/api/v1/collections", get(collections::list_collections))
        .route("/api/v1/shop", get(shop::get_shop))
        .route("/api/v1/cart", get(cart::get_cart))
        .route("/api/v1/cart/add", post(cart::add_to_cart))
        .route("/api/v1/cart/edit", post(cart::edit_cart))
        .route("/api/v1/account", get(account::get_account))
        .route("/api/v1/account/register", post(account::register))
        .route("/api/v1/account/login", post(account::login))
        .route("/api/v1/account/recover", post(account::recover))
        .route("/api/v1/account/orders/{number}", get(account::get_order))
        .route("/api/v1/account/addresses", post(account::create_address))
        .route(
            "/api/v1/account/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route(
            "/api/v1/account/addresses/{id}/default",
            post(account::set_default_address),
        )
        .route("/api/v1/menus/{handle}", get(content::get_menu))
        .route("/api/v1/pages", get(content::list_pages))
        .route("/api/v1/pages/{handle}", get(content::get_page))
        .route("/api/v1/metaobjects/{type}", get(content::list_metaobjects))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::new(HealthData { status: "ok" }, req_id.0))
}


#[cfg(test)]
mod tests {
    use super::test_support::{app_for, get, send};
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("not_found", StatusCode::NOT_FOUND),
            ("validation_error", StatusCode::BAD_REQUEST),
            ("bad_request", StatusCode::BAD_REQUEST),
            ("unauthorized", StatusCode::UNAUTHORIZED),
            ("upstream_error", StatusCode::BAD_GATEWAY),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("anything_else", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[test]
    fn storefront_errors_map_to_api_codes() {
        let not_found = map_storefront_error(
            "r".to_owned(),
            &StorefrontError::NotFound {
                resource: "product shoe".to_owned(),
            },
        );
        assert_eq!(not_found.error.code, "not_found");
        assert_eq!(not_found.error.message, "product shoe not found");

        let user = map_storefront_error(
            "r".to_owned(),
            &StorefrontError::UserErrors {
                operation: "addToCart".to_owned(),
                message: "Merchandise not found".to_owned(),
            },
        );
        assert_eq!(user.error.code, "validation_error");

        let stale = map_storefront_error(
            "r".to_owned(),
            &StorefrontError::InvalidCustomerToken {
                operation: "getCustomer".to_owned(),
            },
        );
        assert_eq!(stale.error.code, "unauthorized");

        let limited = map_storefront_error(
            "r".to_owned(),
            &StorefrontError::RateLimited {
                domain: "test-shop.myshopify.com".to_owned(),
                retry_after_secs: 3,
            },
        );
        assert_eq!(limited.error.code, "upstream_error");

        let pagination = map_storefront_error(
            "r".to_owned(),
            &StorefrontError::PaginationLimit {
                operation: "getProductMeta".to_owned(),
                max_pages: 200,
            },
        );
        assert_eq!(pagination.error.code, "upstream_error");
    }

    #[tokio::test]
    async fn health_returns_envelope_with_request_id() {
        let server = MockServer::start().await;
        let (status, json) = send(app_for(&server), get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
        assert!(json["meta"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2025-01/graphql.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server), get("/api/v1/collections")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "upstream_error");
    }
}
