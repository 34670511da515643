//! Integration tests for the cart routes.
//!
//! Each test drives the full router (sessions, middleware, templates) as a
//! browser would, then checks `/api/cart` and the `HX-Trigger` toasts.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use driftwood_integration_tests::TestContext;
use serde_json::Value;

async fn cart_json(ctx: &mut TestContext) -> Value {
    let resp = ctx.get("/api/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    resp.json()
}

fn item_ids(cart: &Value) -> Vec<String> {
    cart["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Reading the cart
// =============================================================================

#[tokio::test]
async fn test_new_browser_has_empty_hidden_cart() {
    let mut ctx = TestContext::new();
    let cart = cart_json(&mut ctx).await;

    assert_eq!(cart["items"], serde_json::json!([]));
    assert_eq!(cart["count"], 0);
    assert_eq!(cart["isOpen"], false);
    assert!(ctx.has_session());
}

#[tokio::test]
async fn test_drawer_and_badge_fragments() {
    let mut ctx = TestContext::new();

    let drawer = ctx.get("/cart/drawer").await;
    assert_eq!(drawer.status, StatusCode::OK);
    assert!(drawer.body.contains("id=\"cart-drawer\""));
    assert!(drawer.body.contains("Your cart is empty."));

    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;

    let badge = ctx.get("/cart/count").await;
    assert_eq!(badge.status, StatusCode::OK);
    assert!(badge.body.contains(">1</span>"));

    let drawer = ctx.get("/cart/drawer").await;
    assert!(drawer.body.contains("Arc Desk Lamp"));
    assert!(drawer.body.contains("$89.00"));
    assert!(drawer.body.contains("is-open"));
}

// =============================================================================
// Adding
// =============================================================================

#[tokio::test]
async fn test_add_twice_increments_single_line() {
    let mut ctx = TestContext::new();

    let first = ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.toasts(), ["Added Arc Desk Lamp to your cart"]);

    let second = ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;
    assert_eq!(second.toasts(), ["Added another Arc Desk Lamp to your cart"]);
    assert_eq!(second.hx_trigger().unwrap()["cart-updated"]["count"], 2);

    let cart = cart_json(&mut ctx).await;
    assert_eq!(item_ids(&cart), ["desk-lamp"]);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["unitPrice"], "89.00");
    assert_eq!(cart["count"], 2);
    assert_eq!(cart["subtotal"], "178.00");
    assert_eq!(cart["isOpen"], true);
}

#[tokio::test]
async fn test_add_quantity_is_sequential_single_adds() {
    let mut ctx = TestContext::new();

    let resp = ctx
        .post_form("/cart/add", &[("product_id", "linen-shirt"), ("quantity", "3")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.toasts(),
        [
            "Added Relaxed Linen Shirt to your cart",
            "Added another Relaxed Linen Shirt to your cart",
            "Added another Relaxed Linen Shirt to your cart",
        ]
    );

    let cart = cart_json(&mut ctx).await;
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["subtotal"], "238.50");
}

#[tokio::test]
async fn test_add_keeps_insertion_order() {
    let mut ctx = TestContext::new();

    for id in ["throw-blanket", "desk-lamp", "ceramic-vase", "desk-lamp"] {
        ctx.post_form("/cart/add", &[("product_id", id)]).await;
    }

    let cart = cart_json(&mut ctx).await;
    assert_eq!(item_ids(&cart), ["throw-blanket", "desk-lamp", "ceramic-vase"]);
    assert_eq!(cart["count"], 4);
}

#[tokio::test]
async fn test_add_rejects_bad_quantity_and_unknown_product() {
    let mut ctx = TestContext::new();

    let zero = ctx
        .post_form("/cart/add", &[("product_id", "desk-lamp"), ("quantity", "0")])
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let too_many = ctx
        .post_form("/cart/add", &[("product_id", "desk-lamp"), ("quantity", "100")])
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);

    let unknown = ctx.post_form("/cart/add", &[("product_id", "unicorn")]).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let cart = cart_json(&mut ctx).await;
    assert_eq!(cart["count"], 0);
}

// =============================================================================
// Updating and removing
// =============================================================================

#[tokio::test]
async fn test_update_sets_absolute_quantity_without_toast() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;

    let resp = ctx
        .post_form("/cart/update", &[("product_id", "desk-lamp"), ("quantity", "50")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.toasts().is_empty());
    assert_eq!(resp.hx_trigger().unwrap()["cart-updated"]["count"], 50);

    let cart = cart_json(&mut ctx).await;
    assert_eq!(cart["items"][0]["quantity"], 50);
    assert_eq!(cart["subtotal"], "4450.00");
}

#[tokio::test]
async fn test_update_is_capped_at_line_limit() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;
    ctx.post_form("/cart/add", &[("product_id", "ceramic-vase")]).await;

    let too_many = ctx
        .post_form("/cart/update", &[("product_id", "desk-lamp"), ("quantity", "1000")])
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);

    let huge = ctx
        .post_form(
            "/cart/update",
            &[("product_id", "desk-lamp"), ("quantity", "4294967295")],
        )
        .await;
    assert_eq!(huge.status, StatusCode::BAD_REQUEST);

    for id in ["desk-lamp", "ceramic-vase"] {
        let resp = ctx
            .post_form("/cart/update", &[("product_id", id), ("quantity", "999")])
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    let drawer = ctx.get("/cart/drawer").await;
    assert!(drawer.body.contains("disabled"));

    let cart = cart_json(&mut ctx).await;
    assert_eq!(cart["items"][0]["quantity"], 999);
    assert_eq!(cart["items"][1]["quantity"], 999);
    assert_eq!(cart["count"], 1998);
}

#[tokio::test]
async fn test_update_below_one_removes_with_toast() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;
    ctx.post_form("/cart/add", &[("product_id", "ceramic-vase")]).await;

    let resp = ctx
        .post_form("/cart/update", &[("product_id", "desk-lamp"), ("quantity", "0")])
        .await;
    assert_eq!(resp.toasts(), ["Removed Arc Desk Lamp from your cart"]);

    let resp = ctx
        .post_form("/cart/update", &[("product_id", "ceramic-vase"), ("quantity", "-4")])
        .await;
    assert_eq!(resp.toasts(), ["Removed Stoneware Vase from your cart"]);

    let cart = cart_json(&mut ctx).await;
    assert!(item_ids(&cart).is_empty());
    assert_eq!(cart["count"], 0);
}

#[tokio::test]
async fn test_stale_operations_are_silent_no_ops() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;

    let remove = ctx.post_form("/cart/remove", &[("product_id", "missing")]).await;
    assert_eq!(remove.status, StatusCode::OK);
    assert!(remove.toasts().is_empty());

    let update = ctx
        .post_form("/cart/update", &[("product_id", "missing"), ("quantity", "3")])
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert!(update.toasts().is_empty());

    let cart = cart_json(&mut ctx).await;
    assert_eq!(item_ids(&cart), ["desk-lamp"]);
    assert_eq!(cart["count"], 1);
}

#[tokio::test]
async fn test_remove_line_item() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp"), ("quantity", "2")])
        .await;

    let resp = ctx.post_form("/cart/remove", &[("product_id", "desk-lamp")]).await;
    assert_eq!(resp.toasts(), ["Removed Arc Desk Lamp from your cart"]);
    assert!(resp.body.contains("Your cart is empty."));
}

// =============================================================================
// Clearing and visibility
// =============================================================================

#[tokio::test]
async fn test_clear_always_notifies() {
    let mut ctx = TestContext::new();

    let empty = ctx.post_form("/cart/clear", &[]).await;
    assert_eq!(empty.toasts(), ["Your cart has been cleared"]);

    ctx.post_form("/cart/add", &[("product_id", "desk-lamp"), ("quantity", "2")])
        .await;
    ctx.post_form("/cart/add", &[("product_id", "linen-shirt")]).await;

    let resp = ctx.post_form("/cart/clear", &[]).await;
    assert_eq!(resp.toasts(), ["Your cart has been cleared"]);

    let cart = cart_json(&mut ctx).await;
    assert_eq!(cart["items"], serde_json::json!([]));
    assert_eq!(cart["count"], 0);
    assert_eq!(cart["subtotal"], "0");
}

#[tokio::test]
async fn test_open_and_close_do_not_touch_items() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;

    let close = ctx.post_form("/cart/close", &[]).await;
    assert_eq!(close.status, StatusCode::OK);
    assert!(close.hx_trigger().is_none());
    let cart = cart_json(&mut ctx).await;
    assert_eq!(cart["isOpen"], false);
    assert_eq!(cart["count"], 1);

    ctx.post_form("/cart/open", &[]).await;
    assert_eq!(cart_json(&mut ctx).await["isOpen"], true);

    ctx.post_form("/cart/close", &[]).await;
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;
    assert_eq!(cart_json(&mut ctx).await["isOpen"], true);
}

// =============================================================================
// Isolation and persistence
// =============================================================================

#[tokio::test]
async fn test_browsers_have_separate_carts() {
    let mut alice = TestContext::new();
    let mut bob = alice.new_browser();

    alice.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;
    bob.post_form("/cart/add", &[("product_id", "linen-shirt")]).await;

    assert_eq!(item_ids(&cart_json(&mut alice).await), ["desk-lamp"]);
    assert_eq!(item_ids(&cart_json(&mut bob).await), ["linen-shirt"]);
}

#[tokio::test]
async fn test_cart_is_written_to_browser_slot() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", &[("product_id", "desk-lamp")]).await;

    let carts_dir = ctx.data_dir().join("carts");
    let slots: Vec<_> = std::fs::read_dir(&carts_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path().join("cart.json"))
        .collect();
    assert_eq!(slots.len(), 1);

    let raw = std::fs::read_to_string(slots.first().unwrap()).unwrap();
    let snapshot: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot[0]["id"], "desk-lamp");
    assert_eq!(snapshot[0]["name"], "Arc Desk Lamp");
    assert_eq!(snapshot[0]["unitPrice"], "89.00");
    assert_eq!(snapshot[0]["quantity"], 1);
    assert!(snapshot[0]["imageRef"].as_str().unwrap().starts_with("https://"));
}
