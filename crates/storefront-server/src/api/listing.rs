//! Response pieces shared by product listings and search: the filter panel,
//! sort menu and cursor links.

use serde::Serialize;
use storefront_core::{Product, SaleInfo};
use storefront_shopify::filters::{parse_price_range, FilterType};
use storefront_shopify::params::{is_reserved_key, PRICE_KEY, SORT_KEY};
use storefront_shopify::{
    build_param_update, create_url, ApiFilterPredicate, Cursor, FilterDescriptor, PageInfo, PriceRange,
    ProductsPage, QueryParams,
};

/// Sort choices offered by the listing toolbar, as `(param value, label)`.
pub(super) const SORT_OPTIONS: [(&str, &str); 7] = [
    ("TITLE-ASC", "Alphabetically A-Z"),
    ("TITLE-DESC", "Alphabetically Z-A"),
    ("PRICE-DESC", "Price High to Low"),
    ("PRICE-ASC", "Price Low to High"),
    ("CREATED-ASC", "Date Old to New"),
    ("CREATED-DESC", "Date New to Old"),
    ("BEST_SELLING-ASC", "Popularity"),
];

#[derive(Debug, Serialize)]
pub(super) struct ListingData {
    pub products: Vec<ProductCard>,
    pub total_count: Option<i64>,
    pub page: PageLinks,
    pub filters: Vec<FilterGroup>,
    pub sort: SortMenu,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductCard {
    #[serde(flatten)]
    pub product: Product,
    pub sale: SaleInfo,
}

impl From<Product> for ProductCard {
    fn from(product: Product) -> Self {
        let sale = product.sale_info();
        Self { product, sale }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct PageLinks {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub next_href: Option<String>,
    pub prev_href: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct FilterGroup {
    pub id: Option<String>,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: Option<FilterType>,
    /// Empty for the price facet, which is driven by [`PriceControl`].
    pub values: Vec<FilterOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceControl>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct FilterOption {
    pub label: String,
    pub count: u64,
    pub selected: bool,
    pub toggle_href: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub(super) struct PriceControl {
    /// Range the store advertises for the current scope.
    pub bounds: Option<PriceRange>,
    /// Range currently applied from `price=min,max`.
    pub selected: Option<PriceRange>,
    pub clear_href: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct SortMenu {
    pub active: String,
    pub options: Vec<SortChoice>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct SortChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub href: String,
}

pub(super) fn build_listing(
    path: &str,
    params: &QueryParams,
    page: ProductsPage,
    panel: &[FilterDescriptor],
    default_sort: &str,
) -> ListingData {
    ListingData {
        products: page.products.into_iter().map(ProductCard::from).collect(),
        total_count: page.total_count,
        page: page_links(path, params, &page.page_info),
        filters: filter_panel(path, params, panel),
        sort: sort_menu(path, params, default_sort),
    }
}

pub(super) fn page_links(path: &str, params: &QueryParams, info: &PageInfo) -> PageLinks {
    let href = |cursor: Cursor| create_url(path, &params.with_cursor(&cursor));
    PageLinks {
        has_next_page: info.has_next_page,
        has_previous_page: info.has_previous_page,
        next_href: info.next_cursor().map(href),
        prev_href: info.previous_cursor().map(href),
    }
}

/// Every selectable facet with its values marked as selected or not, each
/// carrying the link that toggles it.
///
/// Facets labelled like a reserved query key are left out, since their
/// values can never be selected.
pub(super) fn filter_panel(
    path: &str,
    params: &QueryParams,
    descriptors: &[FilterDescriptor],
) -> Vec<FilterGroup> {
    descriptors
        .iter()
        .filter(|descriptor| descriptor.is_price() || !is_reserved_key(&descriptor.label))
        .map(|descriptor| {
            if descriptor.is_price() {
                return FilterGroup {
                    id: descriptor.id.clone(),
                    label: descriptor.label.clone(),
                    kind: descriptor.kind,
                    values: Vec::new(),
                    price: Some(price_control(path, params, descriptor)),
                };
            }
            let values = descriptor
                .values
                .iter()
                .map(|value| FilterOption {
                    label: value.label.clone(),
                    count: value.count,
                    selected: params.contains(&descriptor.label, &value.label),
                    toggle_href: create_url(
                        path,
                        &build_param_update(params, &descriptor.label, &value.label),
                    ),
                })
                .collect();
            FilterGroup {
                id: descriptor.id.clone(),
                label: descriptor.label.clone(),
                kind: descriptor.kind,
                values,
                price: None,
            }
        })
        .collect()
}

fn price_control(path: &str, params: &QueryParams, descriptor: &FilterDescriptor) -> PriceControl {
    let bounds = descriptor.values.iter().find_map(|value| {
        match serde_json::from_str::<ApiFilterPredicate>(&value.input) {
            Ok(ApiFilterPredicate::Price(range)) => Some(range),
            _ => None,
        }
    });
    let raw = params.get(PRICE_KEY);
    PriceControl {
        bounds,
        selected: raw.and_then(parse_price_range),
        clear_href: raw.map(|_| create_url(path, &params.without_key(PRICE_KEY).without_pagination())),
    }
}

pub(super) fn sort_menu(path: &str, params: &QueryParams, default_sort: &str) -> SortMenu {
    SortMenu {
        active: params.get(SORT_KEY).unwrap_or(default_sort).to_owned(),
        options: SORT_OPTIONS
            .iter()
            .map(|&(value, label)| SortChoice {
                value,
                label,
                href: create_url(path, &params.with_sort(value)),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_shopify::FilterValue;

    fn brand() -> FilterDescriptor {
        FilterDescriptor {
            id: Some("filter.p.vendor".to_owned()),
            label: "Brand".to_owned(),
            kind: Some(FilterType::List),
            values: vec![
                FilterValue {
                    id: None,
                    label: "Nike".to_owned(),
                    count: 4,
                    input: r#"{"productVendor":"Nike"}"#.to_owned(),
                },
                FilterValue {
                    id: None,
                    label: "Adidas".to_owned(),
                    count: 2,
                    input: r#"{"productVendor":"Adidas"}"#.to_owned(),
                },
            ],
        }
    }

    fn price() -> FilterDescriptor {
        FilterDescriptor {
            id: None,
            label: "Price".to_owned(),
            kind: Some(FilterType::PriceRange),
            values: vec![FilterValue {
                id: None,
                label: "Price".to_owned(),
                count: 0,
                input: r#"{"price":{"min":0,"max":250}}"#.to_owned(),
            }],
        }
    }

    #[test]
    fn panel_marks_selected_values_and_builds_toggle_links() {
        let params = QueryParams::parse("Brand=Nike&after=abc");
        let panel = filter_panel("/products", &params, &[brand()]);

        assert_eq!(panel.len(), 1);
        let values = &panel[0].values;
        assert!(values[0].selected);
        assert_eq!(values[0].toggle_href, "/products");
        assert!(!values[1].selected);
        assert_eq!(values[1].toggle_href, "/products?Brand=Nike&Brand=Adidas");
    }

    #[test]
    fn panel_leaves_out_facets_named_like_reserved_keys() {
        let mut paging = brand();
        paging.label = "page".to_owned();
        paging.values.truncate(1);
        paging.values[0].label = "2".to_owned();
        let params = QueryParams::parse("page=2&Brand=Nike");

        let panel = filter_panel("/products", &params, &[paging, brand(), price()]);

        let labels: Vec<_> = panel.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(labels, ["Brand", "Price"]);
    }

    #[test]
    fn price_facet_reports_bounds_selection_and_clear_link() {
        let params = QueryParams::parse("price=10,50&Brand=Nike&page=2");
        let panel = filter_panel("/products", &params, &[price()]);

        let control = panel[0].price.as_ref().expect("price control");
        assert!(panel[0].values.is_empty());
        assert_eq!(
            control.bounds,
            Some(PriceRange {
                min: Some(0.0),
                max: Some(250.0)
            })
        );
        assert_eq!(
            control.selected,
            Some(PriceRange {
                min: Some(10.0),
                max: Some(50.0)
            })
        );
        assert_eq!(control.clear_href.as_deref(), Some("/products?Brand=Nike"));
    }

    #[test]
    fn unparseable_price_param_has_no_selection_but_can_be_cleared() {
        let params = QueryParams::parse("price=abc,50");
        let panel = filter_panel("/search", &params, &[price()]);
        let control = panel[0].price.as_ref().expect("price control");
        assert_eq!(control.selected, None);
        assert_eq!(control.clear_href.as_deref(), Some("/search"));
    }

    #[test]
    fn page_links_replace_existing_cursor() {
        let params = QueryParams::parse("Brand=Nike&before=old");
        let info = PageInfo {
            has_next_page: true,
            has_previous_page: false,
            start_cursor: Some("s".to_owned()),
            end_cursor: Some("e".to_owned()),
        };
        let links = page_links("/products", &params, &info);
        assert_eq!(links.next_href.as_deref(), Some("/products?Brand=Nike&after=e"));
        assert_eq!(links.prev_href, None);
    }

    #[test]
    fn sort_menu_defaults_and_resets_pagination() {
        let params = QueryParams::parse("after=abc&Brand=Nike");
        let menu = sort_menu("/products", &params, "CREATED-ASC");
        assert_eq!(menu.active, "CREATED-ASC");
        assert_eq!(menu.options.len(), SORT_OPTIONS.len());
        assert_eq!(menu.options[0].href, "/products?Brand=Nike&sort=TITLE-ASC");
    }
}
