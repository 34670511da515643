//! Category browser route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use driftwood_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::ALL_CATEGORIES;
use crate::filters;
use crate::routes::products::{CategoryOption, category_options};
use crate::state::AppState;

/// Layout of the category browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryLayout {
    #[default]
    Grid,
    List,
}

impl CategoryLayout {
    /// Parse a query-string value, falling back to `Grid`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "list" { Self::List } else { Self::Grid }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::List)
    }
}

/// Category browser query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    pub category: Option<String>,
    pub view: Option<String>,
}

/// Category browser template.
#[derive(Template, WebTemplate)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate<'a> {
    pub products: Vec<&'a Product>,
    pub category: String,
    pub categories: Vec<CategoryOption>,
    pub layout: CategoryLayout,
}

/// Display the category browser.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Response {
    let catalog = state.catalog();
    let category = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let layout = query
        .view
        .as_deref()
        .map(CategoryLayout::parse)
        .unwrap_or_default();

    CategoriesTemplate {
        products: catalog.in_category(&category),
        categories: category_options(catalog, &category),
        category,
        layout,
    }
    .into_response()
}
