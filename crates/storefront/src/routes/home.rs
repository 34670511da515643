//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use driftwood_core::Product;
use tracing::instrument;

use crate::catalog::HOME_FEATURED_LIMIT;
use crate::filters;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub featured: Vec<&'a Product>,
    pub categories: Vec<&'a str>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog();
    HomeTemplate {
        featured: catalog.featured(HOME_FEATURED_LIMIT),
        categories: catalog.categories(),
    }
    .into_response()
}
