//! Cart route handlers.
//!
//! Every cart surface on the page is an HTMX consumer of the browser's cart
//! store: the header badge, the drawer with its line item rows, and the add
//! to cart forms on product cards and product pages. Mutating routes answer
//! with the re-rendered drawer and an `HX-Trigger` header so the badge
//! refreshes and any toasts raised by the operation are shown.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use driftwood_core::{LineItem, MAX_LINE_QUANTITY, ProductId};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cart::{CartState, CartStore, Notification};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CurrentBrowser;
use crate::routes::{TOAST_EVENT, hx_trigger};
use crate::state::AppState;

/// Most units a single add-to-cart request may add.
pub const MAX_ADD_QUANTITY: i64 = 99;

/// Event fired on the page whenever the cart's items change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

// =============================================================================
// View Models
// =============================================================================

/// Line item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    /// Quantity the "-" button asks for; 0 removes the line.
    pub decrement: i64,
    /// Quantity the "+" button asks for.
    pub increment: i64,
    /// False once the line holds `MAX_LINE_QUANTITY` units.
    pub can_increment: bool,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let quantity = item.quantity();
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image_ref.clone(),
            quantity,
            unit_price: item.unit_price.display(),
            line_total: item.line_total().display(),
            decrement: i64::from(quantity) - 1,
            increment: i64::from(quantity) + 1,
            can_increment: quantity < MAX_LINE_QUANTITY,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: u64,
    pub subtotal: String,
    pub is_open: bool,
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        Self {
            items: state.items().iter().map(CartItemView::from).collect(),
            count: state.count(),
            subtotal: state.subtotal().display(),
            is_open: state.is_open(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<i64>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Helpers
// =============================================================================

/// Result of running one or more operations against a browser's cart.
struct CartOutcome {
    state: Arc<CartState>,
    toasts: Vec<Notification>,
}

/// Run `operation` against the browser's cart while holding its lock.
///
/// The lock serializes every operation on one browser's cart, so each one
/// reads the state left by the previous one and writes its snapshot after it.
async fn with_cart<F>(state: &AppState, browser: CurrentBrowser, operation: F) -> CartOutcome
where
    F: FnOnce(&mut CartStore),
{
    let CurrentBrowser(browser) = browser;
    let cart = state.carts().cart(browser).await;
    let mut cart = cart.lock().await;

    operation(cart.store_mut());

    CartOutcome {
        state: cart.store().state(),
        toasts: cart.take_toasts(),
    }
}

/// The current state of the browser's cart.
async fn current_state(state: &AppState, browser: CurrentBrowser) -> Arc<CartState> {
    with_cart(state, browser, |_| {}).await.state
}

/// Build the `HX-Trigger` header value for a changed cart.
fn trigger_header(state: &CartState, toasts: &[Notification]) -> Result<HeaderValue> {
    let mut events = json!({ CART_UPDATED_EVENT: { "count": state.count() } });
    if !toasts.is_empty() {
        events[TOAST_EVENT] = json!(toasts);
    }
    hx_trigger(&events)
}

/// Drawer fragment plus the `HX-Trigger` header announcing the change.
fn changed_response(outcome: &CartOutcome) -> Result<Response> {
    let trigger = trigger_header(&outcome.state, &outcome.toasts)?;
    Ok((
        [("HX-Trigger", trigger)],
        CartDrawerTemplate {
            cart: CartView::from(outcome.state.as_ref()),
        },
    )
        .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the cart drawer (HTMX).
#[instrument(skip(state))]
pub async fn drawer(State(state): State<AppState>, browser: CurrentBrowser) -> impl IntoResponse {
    let cart = current_state(&state, browser).await;
    CartDrawerTemplate {
        cart: CartView::from(cart.as_ref()),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>, browser: CurrentBrowser) -> impl IntoResponse {
    let cart = current_state(&state, browser).await;
    CartCountTemplate {
        count: cart.count(),
    }
}

/// Reveal the cart drawer (HTMX).
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>, browser: CurrentBrowser) -> impl IntoResponse {
    let outcome = with_cart(&state, browser, CartStore::open_cart).await;
    CartDrawerTemplate {
        cart: CartView::from(outcome.state.as_ref()),
    }
}

/// Hide the cart drawer (HTMX).
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>, browser: CurrentBrowser) -> impl IntoResponse {
    let outcome = with_cart(&state, browser, CartStore::close_cart).await;
    CartDrawerTemplate {
        cart: CartView::from(outcome.state.as_ref()),
    }
}

/// Add a product to the cart (HTMX).
///
/// A quantity above one is applied as that many single-unit adds, each with
/// its own toast.
///
/// # Errors
///
/// Returns 400 for a quantity outside `1..=MAX_ADD_QUANTITY` and 404 for an
/// unknown product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    browser: CurrentBrowser,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = form.quantity.unwrap_or(1);
    if !(1..=MAX_ADD_QUANTITY).contains(&quantity) {
        return Err(AppError::BadRequest(format!(
            "quantity must be between 1 and {MAX_ADD_QUANTITY}"
        )));
    }

    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .find(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", id.as_str()), ("quantity", &quantity.to_string())]),
    );

    let snapshot = product.snapshot();
    let outcome = with_cart(&state, browser, |store| {
        for _ in 0..quantity {
            store.add_to_cart(snapshot.clone());
        }
    })
    .await;

    changed_response(&outcome)
}

/// Set a line item's quantity (HTMX).
///
/// A quantity below one removes the line. Unknown products are ignored: the
/// request usually comes from a drawer rendered before the line went away.
///
/// # Errors
///
/// Returns 400 for a quantity above `MAX_LINE_QUANTITY`.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    browser: CurrentBrowser,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    if form.quantity > i64::from(MAX_LINE_QUANTITY) {
        return Err(AppError::BadRequest(format!(
            "quantity must be at most {MAX_LINE_QUANTITY}"
        )));
    }

    let id = ProductId::new(form.product_id);
    let outcome = with_cart(&state, browser, |store| {
        store.update_quantity(&id, form.quantity);
    })
    .await;

    changed_response(&outcome)
}

/// Remove a line item (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    browser: CurrentBrowser,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));

    let outcome = with_cart(&state, browser, |store| {
        store.remove_from_cart(&id);
    })
    .await;

    changed_response(&outcome)
}

/// Empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, browser: CurrentBrowser) -> Result<Response> {
    add_breadcrumb("cart", "Cleared cart", None);

    let outcome = with_cart(&state, browser, |store| {
        store.clear_cart();
    })
    .await;

    changed_response(&outcome)
}

/// The consolidated cart state as JSON.
#[instrument(skip(state))]
pub async fn state_json(State(state): State<AppState>, browser: CurrentBrowser) -> impl IntoResponse {
    let cart = current_state(&state, browser).await;
    Json(CartState::clone(&cart))
}
