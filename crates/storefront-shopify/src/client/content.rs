//! Online-store content: navigation menus, pages and metaobjects.

use serde::Deserialize;
use serde_json::json;
use storefront_core::{MenuItem, Metaobject, Page};

use crate::connection::collect_nodes;
use crate::error::StorefrontError;
use crate::queries;
use crate::reshape::{reshape_menu, reshape_metaobject, reshape_page};
use crate::types::{Connection, ShopifyMenu, ShopifyMetaobject, ShopifyPage};

use super::StorefrontClient;

#[derive(Deserialize)]
struct MenuData {
    menu: Option<ShopifyMenu>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageData {
    page_by_handle: Option<ShopifyPage>,
}

#[derive(Deserialize)]
struct PagesData {
    pages: Connection<ShopifyPage>,
}

#[derive(Deserialize)]
struct MetaobjectsData {
    metaobjects: Connection<ShopifyMetaobject>,
}

impl StorefrontClient {
    /// Items of the navigation menu with `handle`, e.g. `"footer"`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] when no menu has `handle`.
    pub async fn get_menu(&self, handle: &str) -> Result<Vec<MenuItem>, StorefrontError> {
        let data: MenuData = self
            .request("getMenu", queries::GET_MENU, json!({ "handle": handle }))
            .await?;
        let menu = data.menu.ok_or_else(|| StorefrontError::NotFound {
            resource: format!("menu {handle}"),
        })?;
        let items = reshape_menu(menu.items);
        tracing::info!(handle, items = items.len(), "getMenu");
        Ok(items)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] when no page has `handle`.
    pub async fn get_page(&self, handle: &str) -> Result<Page, StorefrontError> {
        let data: PageData = self
            .request("getPage", queries::GET_PAGE, json!({ "handle": handle }))
            .await?;
        let page = data.page_by_handle.ok_or_else(|| StorefrontError::NotFound {
            resource: format!("page {handle}"),
        })?;
        Ok(reshape_page(page))
    }

    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_pages(&self) -> Result<Vec<Page>, StorefrontError> {
        let data: PagesData = self
            .request("getPages", queries::GET_PAGES, json!({}))
            .await?;
        let pages: Vec<Page> = collect_nodes(data.pages, "pages")
            .into_iter()
            .map(reshape_page)
            .collect();
        tracing::info!(count = pages.len(), "getPages");
        Ok(pages)
    }

    /// Every metaobject of `kind`, e.g. the `"announcements"` carousel slides.
    ///
    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_metaobjects(&self, kind: &str) -> Result<Vec<Metaobject>, StorefrontError> {
        let data: MetaobjectsData = self
            .request("getMetaobjects", queries::GET_METAOBJECTS, json!({ "type": kind }))
            .await?;
        let entries: Vec<Metaobject> = collect_nodes(data.metaobjects, "metaobjects")
            .into_iter()
            .map(reshape_metaobject)
            .collect();
        tracing::info!(kind, count = entries.len(), "getMetaobjects");
        Ok(entries)
    }
}
