//! Catalog command handlers. Output goes to stdout; logs go to stderr.

use storefront_core::{MenuItem, Product};
use storefront_shopify::{parse_filters, ListingQuery, ProductsPage, QueryParams, SortOrder, StorefrontClient};

/// Formats one product as `handle  title  vendor  price  [-N%]`.
pub(crate) fn product_row(product: &Product) -> String {
    let price = product
        .min_price()
        .map_or_else(|| "-".to_owned(), |m| format!("{} {}", m.amount, m.currency_code));
    let sale = product.sale_info();
    let discount = if sale.is_on_sale {
        format!("  -{}%", sale.discount_percent)
    } else {
        String::new()
    };
    format!(
        "{:<32}{:<40}{:<20}{price}{discount}",
        product.handle, product.title, product.vendor
    )
}

fn print_page(page: &ProductsPage, params: &QueryParams) {
    for product in &page.products {
        println!("{}", product_row(product));
    }
    if let Some(total) = page.total_count {
        println!("{} of {total} result(s)", page.products.len());
    }
    if let Some(next) = page.page_info.next_cursor() {
        println!(
            "next page: --query \"{}\"",
            params.with_cursor(&next).to_query_string()
        );
    }
}

/// # Errors
///
/// Returns an error if any storefront request fails.
pub(crate) async fn run_products(
    client: &StorefrontClient,
    collection: Option<&str>,
    query: &str,
) -> anyhow::Result<()> {
    let params = QueryParams::parse(query);
    let listing = ListingQuery::from_params(&params, SortOrder::COLLECTION_DEFAULT);

    let page = match collection {
        Some(handle) => {
            let descriptors = client.get_filters(handle).await?;
            let filters = parse_filters(&params, &descriptors);
            tracing::info!(collection = handle, filters = filters.len(), "listing collection");
            client
                .get_collection_products(handle, &listing.with_filters(filters))
                .await?
        }
        None => client.get_products(None, &listing).await?,
    };
    print_page(&page, &params);
    Ok(())
}

/// # Errors
///
/// Returns an error if any storefront request fails.
pub(crate) async fn run_search(client: &StorefrontClient, term: &str, query: &str) -> anyhow::Result<()> {
    let params = QueryParams::parse(query);
    let descriptors = client.get_filters("all-products").await?;
    let listing = ListingQuery::from_params(&params, SortOrder::SEARCH_DEFAULT)
        .with_filters(parse_filters(&params, &descriptors));
    let page = client.search_products(term, &listing).await?;
    print_page(&page, &params);
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_collections(client: &StorefrontClient) -> anyhow::Result<()> {
    for collection in client.get_collections().await? {
        println!(
            "{:<32}{:<40}{}",
            collection.handle,
            collection.title,
            collection.product_type.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the catalog walk fails or exceeds its page bound.
pub(crate) async fn run_meta(client: &StorefrontClient) -> anyhow::Result<()> {
    let meta = client.get_product_meta().await?;
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_shop(client: &StorefrontClient) -> anyhow::Result<()> {
    let shop = client.get_shop_info().await?;
    println!("{}", serde_json::to_string_pretty(&shop)?);
    Ok(())
}

/// Renders menu items two spaces deeper per level, as `title  path`.
pub(crate) fn menu_lines(items: &[MenuItem], depth: usize, out: &mut Vec<String>) {
    for item in items {
        out.push(format!("{:indent$}{:<32}{}", "", item.title, item.path, indent = depth * 2));
        menu_lines(&item.items, depth + 1, out);
    }
}

/// # Errors
///
/// Returns an error if the menu does not exist or the request fails.
pub(crate) async fn run_menu(client: &StorefrontClient, handle: &str) -> anyhow::Result<()> {
    let mut lines = Vec::new();
    menu_lines(&client.get_menu(handle).await?, 0, &mut lines);
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the page does not exist or the request fails.
pub(crate) async fn run_pages(client: &StorefrontClient, handle: Option<&str>) -> anyhow::Result<()> {
    match handle {
        Some(handle) => {
            let page = client.get_page(handle).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        None => {
            for page in client.get_pages().await? {
                println!("{:<32}{}", page.handle, page.title);
            }
        }
    }
    Ok(())
}
