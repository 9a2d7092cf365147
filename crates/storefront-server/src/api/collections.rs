use axum::{extract::State, Extension, Json};
use serde::Serialize;
use storefront_core::Collection;

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CollectionItem {
    #[serde(flatten)]
    pub collection: Collection,
    /// Listing link for the collection.
    pub href: String,
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CollectionItem>>>, ApiError> {
    let collections = state
        .client
        .get_collections()
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let data = collections
        .into_iter()
        .map(|collection| CollectionItem {
            href: format!("/products?collection={}", collection.handle),
            collection,
        })
        .collect();
    Ok(Json(ApiResponse::new(data, req_id.0)))
}
