//! Filter inspection commands.

use storefront_shopify::{
    build_param_update, create_url, parse_filters, FilterDescriptor, QueryParams, StorefrontClient,
};

/// One line per facet value, marking the values `params` selects. Facets
/// that cannot be selected are never marked.
pub(crate) fn describe_facets(descriptors: &[FilterDescriptor], params: &QueryParams) -> Vec<String> {
    let mut lines = Vec::new();
    for descriptor in descriptors {
        let kind = if descriptor.is_price() { " (price)" } else { "" };
        lines.push(format!("{}{kind}", descriptor.label));
        let selected: Vec<&str> = descriptor
            .selected_values(params)
            .map(|value| value.label.as_str())
            .collect();
        for value in &descriptor.values {
            let mark = if selected.contains(&value.label.as_str()) {
                "*"
            } else {
                " "
            };
            lines.push(format!("  [{mark}] {} ({})", value.label, value.count));
        }
    }
    lines
}

/// Fetches a collection's facets and prints the predicates `query` selects.
///
/// # Errors
///
/// Returns an error if the facets cannot be fetched or the predicates cannot
/// be serialized.
pub(crate) async fn run_filters(
    client: &StorefrontClient,
    collection: &str,
    query: &str,
) -> anyhow::Result<()> {
    let params = QueryParams::parse(query);
    let descriptors = client.get_filters(collection).await?;

    for line in describe_facets(&descriptors, &params) {
        println!("{line}");
    }

    let predicates = parse_filters(&params, &descriptors);
    println!();
    println!("{} filter(s) selected:", predicates.len());
    println!("{}", serde_json::to_string_pretty(&predicates)?);
    Ok(())
}

pub(crate) fn toggle_url(path: &str, query: &str, key: &str, value: &str) -> String {
    let params = QueryParams::parse(query);
    create_url(path, &build_param_update(&params, key, value))
}

pub(crate) fn run_toggle(path: &str, query: &str, key: &str, value: &str) {
    println!("{}", toggle_url(path, query, key, value));
}
