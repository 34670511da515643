//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing (?category=&sort=)
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Category browser (?category=&view=grid|list)
//! GET  /search                 - Search overlay results fragment (?q=)
//!
//! # Cart (HTMX fragments)
//! GET  /cart/drawer            - Drawer fragment
//! GET  /cart/count             - Cart count badge fragment
//! POST /cart/open              - Reveal the drawer
//! POST /cart/close             - Hide the drawer
//! POST /cart/add               - Add product_id, quantity times
//! POST /cart/update            - Set a line item's quantity
//! POST /cart/remove            - Remove a line item
//! POST /cart/clear             - Empty the cart
//! GET  /api/cart               - Cart state as JSON
//!
//! # Pages
//! GET  /about                  - About page
//! GET  /contact                - Contact page
//! POST /contact                - Contact form submission (HTMX)
//! GET  /checkout               - Checkout placeholder
//! ```

pub mod cart;
pub mod categories;
pub mod home;
pub mod pages;
pub mod products;
pub mod search;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Client-side event carrying toasts to show.
pub const TOAST_EVENT: &str = "toast";

/// Encode HTMX events as an `HX-Trigger` header value.
///
/// Non-ASCII characters are escaped so product names survive the trip
/// through an HTTP header.
pub(crate) fn hx_trigger(events: &serde_json::Value) -> Result<HeaderValue> {
    let encoded = ascii_json(&events.to_string());
    HeaderValue::from_str(&encoded)
        .map_err(|e| AppError::Internal(format!("invalid HX-Trigger header: {e}")))
}

/// Escape every non-ASCII character of serialized JSON as `\uXXXX`.
fn ascii_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/drawer", get(cart::drawer))
        .route("/count", get(cart::count))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        .route("/search", get(search::results))
        // Cart
        .nest("/cart", cart_routes())
        .route("/api/cart", get(cart::state_json))
        // Pages
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact).post(pages::submit_contact))
        .route("/checkout", get(pages::checkout))
}
