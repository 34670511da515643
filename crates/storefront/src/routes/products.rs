//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use driftwood_core::{Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{ALL_CATEGORIES, Catalog, ProductSort, RELATED_PRODUCTS_LIMIT};
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::MAX_ADD_QUANTITY;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// A category filter option.
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// A sort option.
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Category filter options, "All" first.
///
/// An unknown `selected` category selects nothing; the listing it produces
/// is simply empty.
#[must_use]
pub fn category_options(catalog: &Catalog, selected: &str) -> Vec<CategoryOption> {
    std::iter::once(ALL_CATEGORIES)
        .chain(catalog.categories())
        .map(|name| CategoryOption {
            name: name.to_string(),
            selected: name == selected,
        })
        .collect()
}

/// Sort options with `selected` marked.
#[must_use]
pub fn sort_options(selected: ProductSort) -> Vec<SortOption> {
    ProductSort::ALL
        .into_iter()
        .map(|sort| SortOption {
            value: sort.as_str(),
            label: sort.label(),
            selected: sort == selected,
        })
        .collect()
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate<'a> {
    pub products: Vec<&'a Product>,
    pub category: String,
    pub categories: Vec<CategoryOption>,
    pub sorts: Vec<SortOption>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate<'a> {
    pub product: &'a Product,
    pub gallery: Vec<&'a str>,
    pub related: Vec<&'a Product>,
    pub max_quantity: i64,
}

/// Display the product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ListingQuery>) -> Response {
    let catalog = state.catalog();
    let category = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let sort = query.sort.as_deref().map(ProductSort::parse).unwrap_or_default();

    ProductsIndexTemplate {
        products: catalog.browse(&category, sort),
        categories: category_options(catalog, &category),
        sorts: sort_options(sort),
        category,
    }
    .into_response()
}

/// Display a product detail page.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let catalog = state.catalog();
    let id = ProductId::new(id);
    let product = catalog
        .find(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductShowTemplate {
        product,
        gallery: product.gallery(),
        related: catalog.related(product, RELATED_PRODUCTS_LIMIT),
        max_quantity: MAX_ADD_QUANTITY,
    }
    .into_response())
}
