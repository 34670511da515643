//! Search overlay filter.
//!
//! A plain case-insensitive substring match over the catalog. The overlay
//! asks for results as the shopper types, so very short queries return
//! nothing rather than the whole catalog.

use driftwood_core::Product;

use crate::catalog::Catalog;

/// Shortest query (in characters, after trimming) that produces results.
pub const MIN_QUERY_CHARS: usize = 2;

/// Products whose name, description or category contains `query`.
///
/// Results keep catalog order.
#[must_use]
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Product> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    catalog
        .list()
        .iter()
        .filter(|product| matches(product, &needle))
        .collect()
}

fn matches(product: &Product, needle: &str) -> bool {
    [&product.name, &product.description, &product.category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
