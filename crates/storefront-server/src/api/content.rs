use axum::{
    extract::{Path, State},
    Extension, Json,
};
use storefront_core::{MenuItem, Metaobject, Page};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState};

/// GET /api/v1/menus/{handle}
pub(super) async fn get_menu(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<Vec<MenuItem>>>, ApiError> {
    let items = state
        .client
        .get_menu(&handle)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(items, req_id.0)))
}

pub(super) async fn list_pages(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Page>>>, ApiError> {
    let pages = state
        .client
        .get_pages()
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(pages, req_id.0)))
}

pub(super) async fn get_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<Page>>, ApiError> {
    let page = state
        .client
        .get_page(&handle)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(page, req_id.0)))
}

/// GET /api/v1/metaobjects/{type}
pub(super) async fn list_metaobjects(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<Vec<Metaobject>>>, ApiError> {
    let entries = state
        .client
        .get_metaobjects(&kind)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(entries, req_id.0)))
}
