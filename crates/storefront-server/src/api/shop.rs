use axum::{extract::State, Extension, Json};
use storefront_core::ShopInfo;

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState};

pub(super) async fn get_shop(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ShopInfo>>, ApiError> {
    let shop = state
        .client
        .get_shop_info()
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(shop, req_id.0)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{app_for, get, send};

    #[tokio::test]
    async fn returns_shop_branding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2025-01/graphql.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"shop": {
                    "name": "Test Shop",
                    "primaryDomain": {"url": "https://shop.example.com"},
                    "brand": {
                        "colors": {"primary": [{"background": "#000000", "foreground": "#ffffff"}]},
                        "logo": null
                    }
                }}
            })))
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server), get("/api/v1/shop")).await;

        assert_eq!(status, StatusCode::OK, "body: {json}");
        assert_eq!(json["data"]["name"], "Test Shop");
        assert_eq!(json["data"]["primary_domain_url"], "https://shop.example.com");
        assert_eq!(json["data"]["primary_colors"][0]["background"], "#000000");
        assert!(json["data"]["logo"].is_null());
    }
}
