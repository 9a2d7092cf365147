use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use storefront_core::{Product, SaleInfo};

use crate::middleware::RequestId;

use super::listing::ProductCard;
use super::{map_storefront_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ProductPage {
    pub product: Product,
    pub sale: SaleInfo,
    pub canonical_url: String,
    pub related: Vec<ProductCard>,
}

/// GET /api/v1/products/{handle}: the product and its recommendations,
/// fetched concurrently.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<ProductPage>>, ApiError> {
    let (product, related) = tokio::try_join!(
        state.client.get_product(&handle),
        state.client.get_related_products(&handle),
    )
    .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let related = related
        .into_iter()
        .filter(|p| p.id != product.id)
        .map(ProductCard::from)
        .collect();
    let page = ProductPage {
        sale: product.sale_info(),
        canonical_url: format!(
            "{}/products/{}",
            state.base_url.trim_end_matches('/'),
            product.handle
        ),
        product,
        related,
    };
    Ok(Json(ApiResponse::new(page, req_id.0)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use storefront_shopify::queries::{GET_PRODUCT, GET_RELATED_PRODUCTS};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{app_for, get, product_node, send};

    const GRAPHQL_PATH: &str = "/api/2025-01/graphql.json";

    #[tokio::test]
    async fn product_page_combines_product_sale_and_related() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({"query": GET_PRODUCT})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"product": product_node("air-max", "Nike")}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({"query": GET_RELATED_PRODUCTS})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"productRecommendations": [
                    product_node("air-max", "Nike"),
                    product_node("pegasus", "Nike")
                ]}
            })))
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server), get("/api/v1/products/air-max")).await;

        assert_eq!(status, StatusCode::OK, "body: {json}");
        let data = &json["data"];
        assert_eq!(data["product"]["handle"], "air-max");
        assert_eq!(data["sale"]["discount_percent"], 20);
        assert_eq!(data["canonical_url"], "http://localhost:3000/products/air-max");
        let related = data["related"].as_array().expect("related array");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0]["handle"], "pegasus");
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({"query": GET_PRODUCT})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"product": null}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({"query": GET_RELATED_PRODUCTS})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"data": {"productRecommendations": null}}),
            ))
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server), get("/api/v1/products/ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "product ghost not found");
    }
}
