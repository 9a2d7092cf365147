use axum::{
    extract::{RawQuery, State},
    http::Uri,
    Extension, Json,
};
use storefront_shopify::params::COLLECTION_KEY;
use storefront_shopify::{parse_filters, ListingQuery, QueryParams, SortOrder};

use crate::middleware::RequestId;

use super::listing::{build_listing, ListingData};
use super::{map_storefront_error, ApiError, ApiResponse, AppState};

/// Collection listed when the request names none.
pub(super) const DEFAULT_COLLECTION: &str = "all-products";

/// GET /api/v1/products: one page of a collection with its filter panel.
///
/// The collection's advertised facets are fetched first so that only values
/// the store currently offers become API filters.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    uri: Uri,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<ListingData>>, ApiError> {
    let params = QueryParams::parse(raw.as_deref().unwrap_or_default());
    let handle = params
        .get(COLLECTION_KEY)
        .filter(|h| !h.trim().is_empty())
        .unwrap_or(DEFAULT_COLLECTION)
        .to_owned();

    let descriptors = state
        .client
        .get_filters(&handle)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    let filters = parse_filters(&params, &descriptors);
    tracing::debug!(collection = %handle, filters = filters.len(), "listing collection");

    let query = ListingQuery::from_params(&params, SortOrder::COLLECTION_DEFAULT).with_filters(filters);
    let page = state
        .client
        .get_collection_products(&handle, &query)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let data = build_listing(
        uri.path(),
        &params,
        page,
        &descriptors,
        SortOrder::COLLECTION_DEFAULT,
    );
    Ok(Json(ApiResponse::new(data, req_id.0)))
}
