//! Catalog reads: product listings, single products, collections, facets and
//! shop branding.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use storefront_core::{Collection, Product, ProductMeta, ShopInfo};

use crate::connection::{collect_nodes, remove_edges_and_nodes};
use crate::error::StorefrontError;
use crate::filters::{ApiFilterPredicate, FilterDescriptor};
use crate::pagination::{PageWindow, CATALOG_WALK_PAGE_SIZE, MAX_PAGES};
use crate::params::{QueryParams, SortOrder, SORT_KEY};
use crate::queries;
use crate::reshape::{clean_collections, extract_product_meta, reshape_product, reshape_products, reshape_shop};
use crate::types::{
    Connection, PageInfo, ProductListing, ProductMetaNode, ShopifyCollection, ShopifyProduct,
    ShopifyShop,
};

use super::StorefrontClient;

/// One page of a product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsPage {
    pub products: Vec<Product>,
    pub page_info: PageInfo,
    /// Facets advertised for the listing's scope, as returned with this page.
    pub filters: Vec<FilterDescriptor>,
    /// Only reported by search.
    pub total_count: Option<i64>,
}

impl From<ProductListing> for ProductsPage {
    fn from(listing: ProductListing) -> Self {
        let ProductListing {
            mut connection,
            filters,
            product_filters,
            total_count,
        } = listing;
        let page_info = connection.page_info.take().unwrap_or_default();
        let filters = if filters.is_empty() {
            product_filters
        } else {
            filters
        };
        Self {
            products: reshape_products(remove_edges_and_nodes(connection)),
            page_info,
            filters,
            total_count,
        }
    }
}

/// Sort, cursor window and filters for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub sort: SortOrder,
    pub window: PageWindow,
    pub filters: Vec<ApiFilterPredicate>,
}

impl ListingQuery {
    /// Reads `sort`, `after` and `before` from the query string.
    #[must_use]
    pub fn from_params(params: &QueryParams, default_sort: &str) -> Self {
        Self {
            sort: SortOrder::from_param(params.get(SORT_KEY), default_sort),
            window: PageWindow::from_params(params),
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Vec<ApiFilterPredicate>) -> Self {
        self.filters = filters;
        self
    }

    fn variables(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        vars.insert("sortKey".to_owned(), Value::from(self.sort.sort_key.as_str()));
        vars.insert("reverse".to_owned(), Value::from(self.sort.reverse));
        self.window.apply(&mut vars);
        vars
    }

    fn variables_with_filters(&self) -> Map<String, Value> {
        let mut vars = self.variables();
        vars.insert("filters".to_owned(), json!(self.filters));
        vars
    }
}

#[derive(Deserialize)]
struct ProductsData {
    products: ProductListing,
}

#[derive(Deserialize)]
struct CollectionProductsData {
    collection: Option<CollectionProducts>,
}

#[derive(Deserialize)]
struct CollectionProducts {
    products: ProductListing,
}

#[derive(Deserialize)]
struct SearchData {
    search: ProductListing,
}

#[derive(Deserialize)]
struct ProductData {
    product: Option<ShopifyProduct>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedData {
    product_recommendations: Option<Vec<Option<ShopifyProduct>>>,
}

#[derive(Deserialize)]
struct CollectionsData {
    collections: Connection<ShopifyCollection>,
}

#[derive(Deserialize)]
struct FiltersData {
    collection: Option<FiltersCollection>,
}

#[derive(Deserialize)]
struct FiltersCollection {
    products: FiltersProducts,
}

#[derive(Deserialize)]
struct FiltersProducts {
    #[serde(default)]
    filters: Vec<FilterDescriptor>,
}

#[derive(Deserialize)]
struct ProductMetaData {
    products: Connection<ProductMetaNode>,
}

#[derive(Deserialize)]
struct ShopData {
    shop: ShopifyShop,
}

impl StorefrontClient {
    /// Lists the whole catalog, optionally narrowed by a search `query`.
    ///
    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_products(
        &self,
        query: Option<&str>,
        listing: &ListingQuery,
    ) -> Result<ProductsPage, StorefrontError> {
        let mut vars = listing.variables();
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            vars.insert("query".to_owned(), Value::from(q));
        }
        let data: ProductsData = self
            .request("getProducts", queries::GET_PRODUCTS, Value::Object(vars))
            .await?;
        let page = ProductsPage::from(data.products);
        tracing::info!(count = page.products.len(), "getProducts");
        Ok(page)
    }

    /// Lists one collection's products with filters applied.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] when no collection has `handle`.
    pub async fn get_collection_products(
        &self,
        handle: &str,
        listing: &ListingQuery,
    ) -> Result<ProductsPage, StorefrontError> {
        let mut vars = listing.variables_with_filters();
        vars.insert("handle".to_owned(), Value::from(handle));
        let data: CollectionProductsData = self
            .request(
                "getCollectionProducts",
                queries::GET_COLLECTION_PRODUCTS,
                Value::Object(vars),
            )
            .await?;
        let collection = data.collection.ok_or_else(|| StorefrontError::NotFound {
            resource: format!("collection {handle}"),
        })?;
        let page = ProductsPage::from(collection.products);
        tracing::info!(
            collection = handle,
            count = page.products.len(),
            has_next = page.page_info.has_next_page,
            "getCollectionProducts"
        );
        Ok(page)
    }

    /// Full-text product search with filters; reports `total_count`.
    ///
    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn search_products(
        &self,
        query: &str,
        listing: &ListingQuery,
    ) -> Result<ProductsPage, StorefrontError> {
        let mut vars = listing.variables_with_filters();
        vars.insert("query".to_owned(), Value::from(query));
        let data: SearchData = self
            .request("searchProducts", queries::SEARCH_PRODUCTS, Value::Object(vars))
            .await?;
        let page = ProductsPage::from(data.search);
        tracing::info!(query, count = page.products.len(), total = ?page.total_count, "searchProducts");
        Ok(page)
    }

    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] when no product has `handle`.
    pub async fn get_product(&self, handle: &str) -> Result<Product, StorefrontError> {
        let data: ProductData = self
            .request("getProduct", queries::GET_PRODUCT, json!({ "handle": handle }))
            .await?;
        data.product
            .map(reshape_product)
            .ok_or_else(|| StorefrontError::NotFound {
                resource: format!("product {handle}"),
            })
    }

    /// Recommendations for a product. Unknown handles yield an empty list.
    ///
    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_related_products(&self, handle: &str) -> Result<Vec<Product>, StorefrontError> {
        let data: RelatedData = self
            .request(
                "getRelatedProducts",
                queries::GET_RELATED_PRODUCTS,
                json!({ "handle": handle }),
            )
            .await?;
        let Some(products) = data.product_recommendations else {
            tracing::debug!(handle, "no recommendations for product");
            return Ok(Vec::new());
        };
        Ok(reshape_products(products))
    }

    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_collections(&self) -> Result<Vec<Collection>, StorefrontError> {
        let data: CollectionsData = self
            .request("getCollections", queries::GET_COLLECTIONS, json!({}))
            .await?;
        let collections = clean_collections(data.collections);
        tracing::info!(count = collections.len(), "getCollections");
        Ok(collections)
    }

    /// Facets the API advertises for a collection, before any filtering.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] when no collection has `handle`.
    pub async fn get_filters(&self, handle: &str) -> Result<Vec<FilterDescriptor>, StorefrontError> {
        let data: FiltersData = self
            .request("getFilters", queries::GET_FILTERS, json!({ "handle": handle }))
            .await?;
        let collection = data.collection.ok_or_else(|| StorefrontError::NotFound {
            resource: format!("collection {handle}"),
        })?;
        Ok(collection.products.filters)
    }

    /// Walks every product page and collects brands, types and option values.
    ///
    /// All-or-nothing: a failure on any page discards what was collected.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::PaginationLimit`] past 200 pages, and
    /// propagates request errors from any page.
    pub async fn get_product_meta(&self) -> Result<ProductMeta, StorefrontError> {
        let mut nodes: Vec<ProductMetaNode> = Vec::new();
        let mut after: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(StorefrontError::PaginationLimit {
                    operation: "getProductMeta".to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let data: ProductMetaData = self
                .request(
                    "getProductMeta",
                    queries::GET_PRODUCT_META,
                    json!({ "first": CATALOG_WALK_PAGE_SIZE, "after": after }),
                )
                .await?;

            let page_info = data.products.page_info.clone().unwrap_or_default();
            nodes.extend(collect_nodes(data.products, "products"));

            match page_info.end_cursor {
                Some(cursor) if page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }

        tracing::info!(products = nodes.len(), pages = page_count, "getProductMeta");
        Ok(extract_product_meta(&nodes))
    }

    /// # Errors
    ///
    /// Propagates transport and GraphQL errors from the request.
    pub async fn get_shop_info(&self) -> Result<ShopInfo, StorefrontError> {
        let data: ShopData = self
            .request("getShopInfo", queries::GET_SHOP, json!({}))
            .await?;
        Ok(reshape_shop(data.shop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_variables_first_page() {
        let listing = ListingQuery::from_params(
            &QueryParams::parse("sort=PRICE-DESC&Brand=Nike"),
            SortOrder::COLLECTION_DEFAULT,
        );
        assert_eq!(
            Value::Object(listing.variables()),
            json!({"sortKey": "PRICE", "reverse": true, "first": 16})
        );
    }

    #[test]
    fn listing_variables_carry_filters() {
        let listing = ListingQuery::from_params(&QueryParams::parse("before=c1"), SortOrder::SEARCH_DEFAULT)
            .with_filters(vec![ApiFilterPredicate::Tag("summer".to_owned())]);
        assert_eq!(
            Value::Object(listing.variables_with_filters()),
            json!({
                "sortKey": "RELEVANCE",
                "reverse": false,
                "last": 16,
                "before": "c1",
                "filters": [{"tag": "summer"}]
            })
        );
    }

    #[test]
    fn products_page_prefers_collection_filters() {
        let listing: ProductListing = serde_json::from_value(json!({
            "edges": [],
            "pageInfo": {"hasNextPage": true, "hasPreviousPage": false, "endCursor": "e"},
            "filters": [{"label": "Brand", "values": []}],
            "productFilters": [{"label": "Other", "values": []}]
        }))
        .expect("listing");
        let page = ProductsPage::from(listing);
        assert_eq!(page.filters[0].label, "Brand");
        assert!(page.page_info.has_next_page);
        assert_eq!(page.total_count, None);
    }

    #[test]
    fn products_page_falls_back_to_search_filters() {
        let listing: ProductListing = serde_json::from_value(json!({
            "edges": [null],
            "productFilters": [{"label": "Brand", "values": []}],
            "totalCount": 3
        }))
        .expect("listing");
        let page = ProductsPage::from(listing);
        assert!(page.products.is_empty());
        assert_eq!(page.filters[0].label, "Brand");
        assert_eq!(page.total_count, Some(3));
        assert_eq!(page.page_info, PageInfo::default());
    }
}
