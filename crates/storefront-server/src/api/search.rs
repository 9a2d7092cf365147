use axum::{
    extract::{RawQuery, State},
    http::Uri,
    Extension, Json,
};
use storefront_shopify::params::QUERY_KEY;
use storefront_shopify::{parse_filters, ListingQuery, QueryParams, SortOrder};

use crate::middleware::RequestId;

use super::listing::{build_listing, ListingData};
use super::products::DEFAULT_COLLECTION;
use super::{map_storefront_error, ApiError, ApiResponse, AppState};

/// GET /api/v1/search: full-text search narrowed by the catalog-wide facets.
///
/// Facets come from the default collection. When they cannot be fetched the
/// search still runs, unfiltered and with an empty panel.
pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    uri: Uri,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<ListingData>>, ApiError> {
    let params = QueryParams::parse(raw.as_deref().unwrap_or_default());
    let Some(term) = params.get(QUERY_KEY).map(str::trim).filter(|q| !q.is_empty()) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "query parameter is required",
        ));
    };
    let term = term.to_owned();

    let descriptors = match state.client.get_filters(DEFAULT_COLLECTION).await {
        Ok(descriptors) => descriptors,
        Err(e) => {
            tracing::warn!(error = %e, "search facets unavailable; searching unfiltered");
            Vec::new()
        }
    };
    let filters = parse_filters(&params, &descriptors);

    let query = ListingQuery::from_params(&params, SortOrder::SEARCH_DEFAULT).with_filters(filters);
    let page = state
        .client
        .search_products(&term, &query)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let data = build_listing(
        uri.path(),
        &params,
        page,
        &descriptors,
        SortOrder::SEARCH_DEFAULT,
    );
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use storefront_shopify::queries::{GET_FILTERS, SEARCH_PRODUCTS};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{app_for, brand_filter, get, product_node, send};

    const GRAPHQL_PATH: &str = "/api/2025-01/graphql.json";

    fn search_body() -> serde_json::Value {
        json!({
            "data": {"search": {
                "totalCount": 42,
                "edges": [{"node": product_node("runner", "Nike")}],
                "pageInfo": {"hasNextPage": false, "hasPreviousPage": false},
                "productFilters": [brand_filter()]
            }}
        })
    }

    #[tokio::test]
    async fn missing_query_is_bad_request() {
        let server = MockServer::start().await;
        let (status, json) = send(app_for(&server), get("/api/v1/search?query=%20%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn search_applies_catalog_facets_and_reports_total() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({"query": GET_FILTERS})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"collection": {"products": {"filters": [brand_filter()]}}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "query": SEARCH_PRODUCTS,
                "variables": {
                    "query": "runner",
                    "sortKey": "RELEVANCE",
                    "filters": [{"productVendor": "Nike"}]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server), get("/api/v1/search?query=runner&Brand=Nike")).await;

        assert_eq!(status, StatusCode::OK, "body: {json}");
        assert_eq!(json["data"]["total_count"], 42);
        assert_eq!(json["data"]["products"][0]["handle"], "runner");
        assert_eq!(json["data"]["sort"]["active"], "RELEVANCE-ASC");
        assert_eq!(
            json["data"]["filters"][0]["values"][0]["toggle_href"],
            "/api/v1/search?query=runner"
        );
    }

    #[tokio::test]
    async fn search_runs_unfiltered_when_facets_fail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({"query": GET_FILTERS})))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "query": SEARCH_PRODUCTS,
                "variables": {"filters": []}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = send(app_for(&server), get("/api/v1/search?query=runner&Brand=Nike")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["filters"], json!([]));
    }
}
