//! Catalog listing and search commands.

use driftwood_core::Product;
use driftwood_storefront::catalog::{ALL_CATEGORIES, Catalog, ProductSort};
use driftwood_storefront::search::MIN_QUERY_CHARS;

/// List products in `category` (all when `None`), ordered by `sort`.
pub fn products(catalog: &Catalog, category: Option<&str>, sort: &str) {
    let sort = ProductSort::parse(sort);
    let products = catalog.browse(category.unwrap_or(ALL_CATEGORIES), sort);
    print(&render_products(&products));
}

/// Print the products matching `query`.
pub fn search(catalog: &Catalog, query: &str) {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        tracing::warn!("search needs at least {MIN_QUERY_CHARS} characters");
        return;
    }
    let results = driftwood_storefront::search::search(catalog, query);
    print(&render_products(&results));
}

/// One product per line: id, name, category, price.
pub fn render_products(products: &[&Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    products
        .iter()
        .map(|p| {
            format!(
                "{:<22} {:<28} {:<12} {:>9}\n",
                p.id.as_str(),
                p.name,
                p.category,
                p.price.display()
            )
        })
        .collect()
}

#[allow(clippy::print_stdout)]
fn print(output: &str) {
    print!("{output}");
}
