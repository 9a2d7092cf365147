//! Conversion of Storefront API payloads into the flat view models in
//! `storefront-core`.

use std::collections::{BTreeMap, BTreeSet};

use storefront_core::{
    Cart, CartCost, CartLine, CartLineCost, CartMerchandise, CartProduct, Collection, Customer,
    CustomerAccessToken, CustomerProfile, Image, MailingAddress, MenuItem, Metaobject,
    MetaobjectField, Money, Order, OrderLineItem, Page, Product, ProductMeta, ProductOption,
    ProductVariant, SelectedOption, Seo, ShopColors, ShopInfo,
};

use crate::connection::collect_nodes;
use crate::types::{
    Connection, ProductMetaNode, ShopifyAccessToken, ShopifyCart, ShopifyCartLine,
    ShopifyCollection, ShopifyColorPair, ShopifyCustomer, ShopifyCustomerProfile, ShopifyImage,
    ShopifyMailingAddress, ShopifyMenuItem, ShopifyMetaobject, ShopifyMoney, ShopifyOrder,
    ShopifyPage, ShopifyProduct, ShopifySelectedOption, ShopifySeo, ShopifyShop, ShopifyVariant,
};

/// Catch-all collections whose first product says nothing about their type.
pub const UNTYPED_COLLECTION_HANDLES: [&str; 3] = ["all-products", "sale", "featured"];

fn money(raw: ShopifyMoney) -> Money {
    Money::new(raw.amount, raw.currency_code)
}

fn image(raw: ShopifyImage) -> Image {
    Image {
        url: raw.url,
        alt_text: raw.alt_text,
        width: raw.width,
        height: raw.height,
    }
}

fn seo(raw: ShopifySeo) -> Seo {
    Seo {
        title: raw.title,
        description: raw.description,
    }
}

fn selected_option(raw: ShopifySelectedOption) -> SelectedOption {
    SelectedOption {
        name: raw.name,
        value: raw.value,
    }
}

fn variant(raw: ShopifyVariant) -> ProductVariant {
    ProductVariant {
        id: raw.id,
        title: raw.title,
        quantity_available: raw.quantity_available,
        available_for_sale: raw.available_for_sale,
        selected_options: raw.selected_options.into_iter().map(selected_option).collect(),
        image: raw.image.map(image),
        price: money(raw.price),
        compare_at_price: raw.compare_at_price.map(money),
    }
}

fn collection(raw: ShopifyCollection) -> Collection {
    let product_type = if UNTYPED_COLLECTION_HANDLES.contains(&raw.handle.as_str()) {
        None
    } else {
        raw.products
            .map(|products| collect_nodes(products, "collection.products"))
            .and_then(|nodes| nodes.into_iter().next())
            .and_then(|node| node.product_type)
    };

    Collection {
        id: raw.id,
        handle: raw.handle,
        title: raw.title,
        description: raw.description,
        image: raw.image.map(image),
        seo: seo(raw.seo),
        product_type,
    }
}

/// Flattens a collection connection and derives each collection's type.
#[must_use]
pub fn clean_collections(collections: Connection<ShopifyCollection>) -> Vec<Collection> {
    collect_nodes(collections, "collections")
        .into_iter()
        .map(collection)
        .collect()
}

/// Flattens a product's image, variant and collection connections.
#[must_use]
pub fn reshape_product(raw: ShopifyProduct) -> Product {
    Product {
        id: raw.id,
        handle: raw.handle,
        title: raw.title,
        vendor: raw.vendor,
        product_type: raw.product_type,
        description: raw.description,
        description_html: raw.description_html,
        created_at: raw.created_at,
        total_inventory: raw.total_inventory,
        available_for_sale: raw.available_for_sale,
        options: raw
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.values,
            })
            .collect(),
        featured_image: raw.featured_image.map(image),
        seo: seo(raw.seo),
        images: collect_nodes(raw.images, "product.images")
            .into_iter()
            .map(image)
            .collect(),
        variants: collect_nodes(raw.variants, "product.variants")
            .into_iter()
            .map(variant)
            .collect(),
        collections: raw.collections.map(clean_collections).unwrap_or_default(),
    }
}

/// Reshapes a list of products, skipping `null` entries.
#[must_use]
pub fn reshape_products(raw: Vec<Option<ShopifyProduct>>) -> Vec<Product> {
    raw.into_iter().flatten().map(reshape_product).collect()
}

fn cart_line(raw: ShopifyCartLine) -> CartLine {
    let merchandise = raw.merchandise;
    CartLine {
        id: raw.id,
        quantity: raw.quantity,
        cost: CartLineCost {
            total_amount: money(raw.cost.total_amount),
            amount_per_quantity: money(raw.cost.amount_per_quantity),
        },
        merchandise: CartMerchandise {
            id: merchandise.id,
            title: merchandise.title,
            selected_options: merchandise
                .selected_options
                .into_iter()
                .map(selected_option)
                .collect(),
            product: CartProduct {
                id: merchandise.product.id,
                handle: merchandise.product.handle,
                title: merchandise.product.title,
                featured_image: merchandise.product.featured_image.map(image),
            },
        },
    }
}

#[must_use]
pub fn reshape_cart(raw: ShopifyCart) -> Cart {
    Cart {
        id: raw.id,
        checkout_url: raw.checkout_url,
        total_quantity: raw.total_quantity,
        cost: CartCost {
            subtotal_amount: money(raw.cost.subtotal_amount),
            total_amount: money(raw.cost.total_amount),
            total_tax_amount: raw.cost.total_tax_amount.map(money),
        },
        lines: collect_nodes(raw.lines, "cart.lines")
            .into_iter()
            .map(cart_line)
            .collect(),
    }
}

fn colors(pairs: Vec<ShopifyColorPair>) -> Vec<ShopColors> {
    pairs
        .into_iter()
        .map(|p| ShopColors {
            background: p.background,
            foreground: p.foreground,
        })
        .collect()
}

#[must_use]
pub fn reshape_shop(raw: ShopifyShop) -> ShopInfo {
    let brand = raw.brand;
    let logo = brand
        .as_ref()
        .and_then(|b| b.logo.as_ref())
        .and_then(|l| l.image.clone())
        .map(image);
    let palette = brand.and_then(|b| b.colors).unwrap_or_default();

    ShopInfo {
        name: raw.name,
        primary_domain_url: raw.primary_domain.map(|d| d.url),
        logo,
        primary_colors: colors(palette.primary),
        secondary_colors: colors(palette.secondary),
    }
}

/// Collects sorted, de-duplicated brands, types and option values.
///
/// Empty vendor and type strings are ignored.
#[must_use]
pub fn extract_product_meta(nodes: &[ProductMetaNode]) -> ProductMeta {
    let mut brands = BTreeSet::new();
    let mut types = BTreeSet::new();
    let mut options: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for node in nodes {
        if let Some(vendor) = node.vendor.as_deref().filter(|v| !v.is_empty()) {
            brands.insert(vendor.to_owned());
        }
        if let Some(kind) = node.product_type.as_deref().filter(|t| !t.is_empty()) {
            types.insert(kind.to_owned());
        }
        for option in &node.options {
            options
                .entry(option.name.clone())
                .or_default()
                .extend(option.values.iter().cloned());
        }
    }

    ProductMeta {
        brands: brands.into_iter().collect(),
        types: types.into_iter().collect(),
        options: options
            .into_iter()
            .map(|(name, values)| (name, values.into_iter().collect()))
            .collect(),
    }
}

pub(crate) fn mailing_address(raw: ShopifyMailingAddress) -> MailingAddress {
    MailingAddress {
        id: raw.id,
        address1: raw.address1,
        address2: raw.address2,
        city: raw.city,
        country: raw.country,
    }
}

fn order(raw: ShopifyOrder) -> Order {
    Order {
        order_number: raw.order_number,
        processed_at: raw.processed_at,
        financial_status: raw.financial_status,
        customer_url: raw.customer_url,
        subtotal: raw.current_subtotal_price.map(money),
        total: money(raw.current_total_price),
        shipping: raw.current_total_shipping_price.map(money),
        tax: raw.current_total_tax.map(money),
        line_items: collect_nodes(raw.line_items, "order.lineItems")
            .into_iter()
            .map(|item| OrderLineItem {
                title: item.title,
                quantity: item.current_quantity,
                discounted_total: money(item.discounted_total_price),
                variant: item.variant.map(variant),
            })
            .collect(),
    }
}

/// Flattens a customer's address, order and order line connections.
#[must_use]
pub fn reshape_customer(raw: ShopifyCustomer) -> Customer {
    Customer {
        id: raw.id,
        email: raw.email,
        first_name: raw.first_name,
        last_name: raw.last_name,
        phone: raw.phone,
        default_address: raw.default_address.map(mailing_address),
        addresses: collect_nodes(raw.addresses, "customer.addresses")
            .into_iter()
            .map(mailing_address)
            .collect(),
        orders: collect_nodes(raw.orders, "customer.orders")
            .into_iter()
            .map(order)
            .collect(),
    }
}

pub(crate) fn customer_profile(raw: ShopifyCustomerProfile) -> CustomerProfile {
    CustomerProfile {
        email: raw.email,
        first_name: raw.first_name,
        last_name: raw.last_name,
        phone: raw.phone,
        accepts_marketing: raw.accepts_marketing,
    }
}

pub(crate) fn access_token(raw: ShopifyAccessToken) -> CustomerAccessToken {
    CustomerAccessToken {
        access_token: raw.access_token,
        expires_at: raw.expires_at,
    }
}

/// Site-relative form of a menu link: the path and query of an absolute
/// URL, or the link itself when it is already relative.
fn menu_path(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) if parsed.has_host() => match parsed.query() {
            Some(query) => format!("{}?{query}", parsed.path()),
            None => parsed.path().to_owned(),
        },
        _ => url.to_owned(),
    }
}

/// Converts menu items, keeping nesting. Items without a URL link to `/`.
#[must_use]
pub fn reshape_menu(items: Vec<ShopifyMenuItem>) -> Vec<MenuItem> {
    items
        .into_iter()
        .map(|item| {
            let url = item.url.unwrap_or_else(|| "/".to_owned());
            MenuItem {
                title: item.title,
                path: menu_path(&url),
                url,
                items: reshape_menu(item.items),
            }
        })
        .collect()
}

#[must_use]
pub fn reshape_page(raw: ShopifyPage) -> Page {
    Page {
        id: raw.id,
        handle: raw.handle,
        title: raw.title,
        body: raw.body,
        body_summary: raw.body_summary,
        seo: seo(raw.seo),
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

#[must_use]
pub fn reshape_metaobject(raw: ShopifyMetaobject) -> Metaobject {
    Metaobject {
        handle: raw.handle,
        kind: raw.kind,
        fields: raw
            .fields
            .into_iter()
            .map(|field| MetaobjectField {
                key: field.key,
                kind: field.kind,
                value: field.value,
                image: field.reference.and_then(|r| r.image).map(image),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "reshape_test.rs"]
mod tests;
