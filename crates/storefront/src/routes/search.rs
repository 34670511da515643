//! Search overlay route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use driftwood_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::search::{MIN_QUERY_CHARS, search};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate<'a> {
    pub query: String,
    pub results: Vec<&'a Product>,
    /// Query is too short to search; show a hint instead of "no results".
    pub too_short: bool,
}

/// Render search overlay results (HTMX).
#[instrument(skip(state))]
pub async fn results(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let trimmed = query.q.trim();

    SearchResultsTemplate {
        results: search(state.catalog(), trimmed),
        too_short: trimmed.chars().count() < MIN_QUERY_CHARS,
        query: trimmed.to_string(),
    }
    .into_response()
}
