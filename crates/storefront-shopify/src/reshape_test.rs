use serde_json::json;

use super::*;
use crate::types::ShopifyProductOption;

fn product_json() -> serde_json::Value {
    json!({
        "id": "gid://shopify/Product/1",
        "handle": "trail-runner",
        "title": "Trail Runner",
        "vendor": "Nike",
        "productType": "Shoes",
        "description": "Light.",
        "descriptionHtml": "<p>Light.</p>",
        "createdAt": "2025-03-01T10:00:00Z",
        "totalInventory": null,
        "availableForSale": true,
        "options": [{"name": "Size", "values": ["42", "43"]}],
        "featuredImage": {"url": "https://cdn.shopify.com/a.jpg", "altText": null},
        "seo": {"title": null, "description": null},
        "images": {"edges": [
            {"node": {"url": "https://cdn.shopify.com/a.jpg"}},
            {"node": null},
            {"node": {"url": "https://cdn.shopify.com/b.jpg", "width": 800, "height": 600}}
        ]},
        "variants": {"edges": [{"node": {
            "id": "gid://shopify/ProductVariant/11",
            "title": "42",
            "quantityAvailable": null,
            "selectedOptions": [{"name": "Size", "value": "42"}],
            "image": null,
            "price": {"amount": "75.00", "currencyCode": "EUR"},
            "compareAtPrice": {"amount": "100.00", "currencyCode": "EUR"}
        }}]},
        "collections": {"edges": [
            {"node": {
                "id": "gid://shopify/Collection/5",
                "handle": "running",
                "title": "Running",
                "description": "",
                "image": null,
                "seo": {"title": "Running", "description": null},
                "products": {"edges": [{"node": {"productType": "Shoes"}}]}
            }},
            {"node": {
                "id": "gid://shopify/Collection/6",
                "handle": "sale",
                "title": "Sale",
                "description": "",
                "seo": {},
                "products": {"edges": [{"node": {"productType": "Shoes"}}]}
            }}
        ]}
    })
}

fn parse_product() -> ShopifyProduct {
    serde_json::from_value(product_json()).expect("product fixture")
}

// -----------------------------------------------------------------------
// reshape_product
// -----------------------------------------------------------------------

#[test]
fn flattens_images_dropping_empty_edges() {
    let product = reshape_product(parse_product());
    let urls: Vec<_> = product.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, ["https://cdn.shopify.com/a.jpg", "https://cdn.shopify.com/b.jpg"]);
    assert_eq!(product.images[1].width, Some(800));
}

#[test]
fn flattens_variants_with_money() {
    let product = reshape_product(parse_product());
    assert_eq!(product.variants.len(), 1);
    let v = &product.variants[0];
    assert_eq!(v.price.amount.to_string(), "75.00");
    assert_eq!(v.price.currency_code, "EUR");
    assert!(v.available_for_sale, "missing availableForSale defaults to true");
    assert_eq!(v.selected_options[0].value, "42");
}

#[test]
fn reshaped_product_reports_sale() {
    let info = reshape_product(parse_product()).sale_info();
    assert!(info.is_on_sale);
    assert_eq!(info.discount_percent, 25);
}

#[test]
fn product_without_collections_field_has_none() {
    let mut raw = product_json();
    raw.as_object_mut().expect("object").remove("collections");
    let product = reshape_product(serde_json::from_value(raw).expect("product"));
    assert!(product.collections.is_empty());
}

#[test]
fn reshape_products_skips_null_entries() {
    let products = reshape_products(vec![Some(parse_product()), None, Some(parse_product())]);
    assert_eq!(products.len(), 2);
}

// -----------------------------------------------------------------------
// clean_collections
// -----------------------------------------------------------------------

#[test]
fn collection_type_comes_from_first_product() {
    let product = reshape_product(parse_product());
    assert_eq!(product.collections[0].product_type.as_deref(), Some("Shoes"));
}

#[test]
fn catch_all_collections_have_no_type() {
    let product = reshape_product(parse_product());
    assert_eq!(product.collections[1].handle, "sale");
    assert_eq!(product.collections[1].product_type, None);
}

#[test]
fn collection_without_products_has_no_type() {
    let raw: Connection<ShopifyCollection> = serde_json::from_value(json!({"edges": [
        {"node": {"id": "c1", "handle": "empty", "title": "Empty", "products": {"edges": []}}},
        {"node": {"id": "c2", "handle": "bare", "title": "Bare"}}
    ]}))
    .expect("collections");
    let collections = clean_collections(raw);
    assert_eq!(collections.len(), 2);
    assert!(collections.iter().all(|c| c.product_type.is_none()));
}

// -----------------------------------------------------------------------
// reshape_cart
// -----------------------------------------------------------------------

#[test]
fn reshapes_cart_lines() {
    let raw: ShopifyCart = serde_json::from_value(json!({
        "id": "gid://shopify/Cart/abc",
        "checkoutUrl": "https://shop.example/checkout/abc",
        "totalQuantity": 3,
        "cost": {
            "subtotalAmount": {"amount": "30.0", "currencyCode": "USD"},
            "totalAmount": {"amount": "30.0", "currencyCode": "USD"},
            "totalTaxAmount": null
        },
        "lines": {"edges": [{"node": {
            "id": "gid://shopify/CartLine/1",
            "quantity": 3,
            "cost": {
                "totalAmount": {"amount": "30.0", "currencyCode": "USD"},
                "amountPerQuantity": {"amount": "10.0", "currencyCode": "USD"}
            },
            "merchandise": {
                "id": "gid://shopify/ProductVariant/11",
                "title": "42",
                "selectedOptions": [],
                "product": {"id": "gid://shopify/Product/1", "handle": "trail-runner", "title": "Trail Runner"}
            }
        }}]}
    }))
    .expect("cart");

    let cart = reshape_cart(raw);
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.cost.total_tax_amount, None);
    assert_eq!(
        cart.line_for_merchandise("gid://shopify/ProductVariant/11").map(|l| l.quantity),
        Some(3)
    );
}

// -----------------------------------------------------------------------
// reshape_shop
// -----------------------------------------------------------------------

#[test]
fn reshapes_shop_branding() {
    let raw: ShopifyShop = serde_json::from_value(json!({
        "name": "Demo Store",
        "brand": {
            "colors": {
                "primary": [{"background": "#000000", "foreground": "#ffffff"}],
                "secondary": []
            },
            "logo": {"image": {"url": "https://cdn.shopify.com/logo.png"}}
        },
        "primaryDomain": {"url": "https://demo.example"}
    }))
    .expect("shop");

    let shop = reshape_shop(raw);
    assert_eq!(shop.primary_domain_url.as_deref(), Some("https://demo.example"));
    assert_eq!(shop.logo.map(|l| l.url).as_deref(), Some("https://cdn.shopify.com/logo.png"));
    assert_eq!(shop.primary_colors[0].background.as_deref(), Some("#000000"));
    assert!(shop.secondary_colors.is_empty());
}

#[test]
fn shop_without_brand_has_empty_palette() {
    let shop = reshape_shop(serde_json::from_value(json!({"name": "Plain"})).expect("shop"));
    assert!(shop.logo.is_none());
    assert!(shop.primary_colors.is_empty());
}

// -----------------------------------------------------------------------
// extract_product_meta
// -----------------------------------------------------------------------

fn meta_node(vendor: &str, kind: &str, sizes: &[&str]) -> ProductMetaNode {
    ProductMetaNode {
        product_type: Some(kind.to_owned()),
        vendor: Some(vendor.to_owned()),
        options: vec![ShopifyProductOption {
            name: "Size".to_owned(),
            values: sizes.iter().map(|s| (*s).to_owned()).collect(),
        }],
    }
}

#[test]
fn product_meta_is_sorted_and_unique() {
    let meta = extract_product_meta(&[
        meta_node("Puma", "Shoes", &["44", "42"]),
        meta_node("Adidas", "Shirts", &["42"]),
        meta_node("Puma", "", &["40"]),
    ]);
    assert_eq!(meta.brands, ["Adidas", "Puma"]);
    assert_eq!(meta.types, ["Shirts", "Shoes"]);
    assert_eq!(meta.options["Size"], ["40", "42", "44"]);
}

#[test]
fn product_meta_of_nothing_is_empty() {
    assert_eq!(extract_product_meta(&[]), ProductMeta::default());
}

// -----------------------------------------------------------------------
// customer
// -----------------------------------------------------------------------

#[test]
fn customer_connections_are_flattened() {
    let raw: ShopifyCustomer = serde_json::from_value(json!({
        "id": "gid://shopify/Customer/7",
        "email": "ana@example.com",
        "firstName": "Ana",
        "lastName": null,
        "defaultAddress": {"id": "gid://shopify/MailingAddress/1", "city": "Cluj"},
        "addresses": {"edges": [
            {"node": {"id": "gid://shopify/MailingAddress/1", "city": "Cluj"}},
            {"node": null},
            {"node": {"id": "gid://shopify/MailingAddress/2", "city": "Iasi"}}
        ]},
        "orders": {"edges": [{"node": {
            "orderNumber": 1001,
            "processedAt": "2025-04-02T08:30:00Z",
            "financialStatus": "PAID",
            "currentTotalPrice": {"amount": "120.00", "currencyCode": "RON"},
            "currentTotalTax": null,
            "lineItems": {"edges": [{"node": {
                "title": "Trail Runner",
                "currentQuantity": 2,
                "discountedTotalPrice": {"amount": "100.00", "currencyCode": "RON"},
                "variant": null
            }}]}
        }}]}
    }))
    .expect("customer");

    let customer = reshape_customer(raw);

    assert_eq!(customer.addresses.len(), 2);
    assert_eq!(customer.addresses[1].city.as_deref(), Some("Iasi"));
    assert!(customer.is_default_address("gid://shopify/MailingAddress/1"));
    let order = customer.order("1001").expect("order");
    assert_eq!(order.total.amount.to_string(), "120.00");
    assert!(order.tax.is_none());
    assert_eq!(order.line_items[0].quantity, 2);
    assert!(order.line_items[0].variant.is_none());
}

// -----------------------------------------------------------------------
// content
// -----------------------------------------------------------------------

#[test]
fn menu_links_become_site_relative_paths() {
    let items: Vec<crate::types::ShopifyMenuItem> = serde_json::from_value(json!([
        {"title": "Shoes", "url": "https://shop.example.com/collections/shoes?sort=PRICE-ASC", "items": [
            {"title": "Running", "url": "https://shop.example.com/collections/running"}
        ]},
        {"title": "About", "url": "/pages/about"},
        {"title": "Mail", "url": "mailto:hi@example.com"},
        {"title": "Home", "url": null}
    ]))
    .expect("menu items");

    let menu = reshape_menu(items);

    assert_eq!(menu[0].path, "/collections/shoes?sort=PRICE-ASC");
    assert_eq!(menu[0].items[0].path, "/collections/running");
    assert_eq!(menu[1].path, "/pages/about");
    assert_eq!(menu[2].path, "mailto:hi@example.com");
    assert_eq!(menu[3].url, "/");
    assert!(menu[3].items.is_empty());
}

#[test]
fn metaobject_image_references_are_lifted() {
    let raw: crate::types::ShopifyMetaobject = serde_json::from_value(json!({
        "type": "announcements",
        "handle": "spring",
        "fields": [
            {"key": "title", "type": "single_line_text_field", "value": "Spring sale", "reference": null},
            {"key": "image", "type": "file_reference", "value": "gid://shopify/MediaImage/3",
             "reference": {"image": {"url": "https://cdn.shopify.com/s.jpg"}}},
            {"key": "link", "type": "product_reference", "value": "gid://shopify/Product/1", "reference": {}}
        ]
    }))
    .expect("metaobject");

    let slide = reshape_metaobject(raw);

    assert_eq!(slide.kind, "announcements");
    assert_eq!(slide.value("title"), Some("Spring sale"));
    assert_eq!(
        slide.field("image").and_then(|f| f.image.as_ref()).map(|i| i.url.as_str()),
        Some("https://cdn.shopify.com/s.jpg")
    );
    assert!(slide.field("link").and_then(|f| f.image.as_ref()).is_none());
}
