//! Shopping cart store.
//!
//! [`CartStore`] is the single writer of a shopper's cart. Every surface that
//! shows or changes the cart (header badge, drawer, line item rows, add to
//! cart buttons, the CLI) reads [`CartState`] snapshots and routes mutations
//! through the store's operations.
//!
//! A mutation runs to completion in this order:
//!
//! 1. decide the change and build the next item list
//! 2. wrap it in a new `CartState` (count and subtotal computed with it); a
//!    list whose subtotal would overflow is refused and the cart is unchanged
//! 3. write the item list to the [`CartStorage`] slot
//! 4. publish the state to subscribers
//! 5. hand the resulting [`Notification`], if any, to the [`Notifier`]

pub mod notify;
pub mod registry;
pub mod snapshot;
pub mod storage;

use std::num::NonZeroU32;
use std::sync::Arc;

use driftwood_core::{
    LineItem, MAX_LINE_QUANTITY, Price, ProductId, ProductSnapshot, cart_count, cart_subtotal,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

pub use notify::{NoopNotifier, Notification, Notifier, NotifyKind, ToastQueue, TracingNotifier};
pub use registry::{BrowserCart, BrowserId, CartRegistry};
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};

/// The items' subtotal does not fit in a [`Price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart subtotal is too large to represent")]
pub struct SubtotalOverflow;

/// A consistent view of the cart.
///
/// `count` and `subtotal` are computed from `items` when the state is built
/// and can't be set independently, so a reader always sees aggregates that
/// match the items next to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<LineItem>,
    count: u64,
    subtotal: Price,
    is_open: bool,
}

impl CartState {
    /// Build a state from `items`, computing its aggregates.
    ///
    /// # Errors
    ///
    /// Returns `SubtotalOverflow` if the items' subtotal can't be represented.
    pub fn new(items: Vec<LineItem>, is_open: bool) -> Result<Self, SubtotalOverflow> {
        let subtotal = cart_subtotal(&items).ok_or(SubtotalOverflow)?;
        Ok(Self {
            count: cart_count(&items),
            items,
            subtotal,
            is_open,
        })
    }

    /// An empty, hidden cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            subtotal: Price::zero(),
            is_open: false,
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total units in the cart.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Sum of `unit_price × quantity` over all items.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Whether the cart overlay is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line item for `id`, if present.
    #[must_use]
    pub fn item(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::empty()
    }
}

/// What a cart operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line item was appended with quantity 1.
    Added { id: ProductId, name: String },
    /// An existing line item's quantity went up by one.
    Incremented {
        id: ProductId,
        name: String,
        quantity: u32,
    },
    /// A line item was removed.
    Removed { id: ProductId, name: String },
    /// A line item's quantity was set to an absolute value.
    QuantitySet { id: ProductId, quantity: u32 },
    /// All line items were removed.
    Cleared,
    /// Nothing matched or the change was refused; the items are untouched.
    Unchanged,
}

impl CartChange {
    /// The shopper-facing notification for this change, if it has one.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::Added { name, .. } => {
                Some(Notification::success(format!("Added {name} to your cart")))
            }
            Self::Incremented { name, .. } => Some(Notification::success(format!(
                "Added another {name} to your cart"
            ))),
            Self::Removed { name, .. } => {
                Some(Notification::info(format!("Removed {name} from your cart")))
            }
            Self::Cleared => Some(Notification::info("Your cart has been cleared")),
            Self::QuantitySet { .. } | Self::Unchanged => None,
        }
    }
}

/// Owner of one shopper's cart.
pub struct CartStore {
    state: Arc<CartState>,
    storage: Arc<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
    publisher: watch::Sender<Arc<CartState>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open a store over `storage`, rehydrating any saved cart.
    ///
    /// An empty slot yields an empty cart. A malformed snapshot is discarded
    /// and the cart starts empty; an unreadable slot leaves the cart running
    /// in memory only. Neither case is reported to the shopper.
    pub fn open(storage: Arc<dyn CartStorage>, notifier: Arc<dyn Notifier>) -> Self {
        // Decoding already refuses snapshots whose subtotal overflows
        let state = CartState::new(load_items(storage.as_ref()), false).unwrap_or_default();
        let state = Arc::new(state);
        let (publisher, _) = watch::channel(Arc::clone(&state));

        Self {
            state,
            storage,
            notifier,
            publisher,
        }
    }

    /// The current cart state.
    #[must_use]
    pub fn state(&self) -> Arc<CartState> {
        Arc::clone(&self.state)
    }

    /// Receive every state this store publishes from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<CartState>> {
        self.publisher.subscribe()
    }

    /// Add one unit of `product` and reveal the cart.
    ///
    /// An existing line item with the same id gains one unit and keeps the
    /// price it was added at; otherwise a new line item is appended. A line
    /// already at [`MAX_LINE_QUANTITY`] is left as is, and the cart is still
    /// revealed.
    pub fn add_to_cart(&mut self, product: ProductSnapshot) -> CartChange {
        let mut items = self.state.items.clone();

        let change = if let Some(existing) = items.iter_mut().find(|item| item.id == product.id) {
            if existing.quantity() >= MAX_LINE_QUANTITY {
                tracing::debug!(product_id = %product.id, "add ignored, line is at its limit");
                self.set_visibility(true);
                return CartChange::Unchanged;
            }
            existing.quantity = existing.quantity.saturating_add(1);
            CartChange::Incremented {
                id: product.id,
                name: product.name,
                quantity: existing.quantity(),
            }
        } else {
            let change = CartChange::Added {
                id: product.id.clone(),
                name: product.name.clone(),
            };
            items.push(LineItem::from_snapshot(product));
            change
        };

        if !self.commit(items, true) {
            self.set_visibility(true);
            return CartChange::Unchanged;
        }
        self.announce(&change);
        change
    }

    /// Remove the line item for `id`. Unknown ids are ignored.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> CartChange {
        let Some(index) = self.state.position(id) else {
            tracing::debug!(product_id = %id, "remove ignored, item not in cart");
            return CartChange::Unchanged;
        };

        let mut items = self.state.items.clone();
        let removed = items.remove(index);
        if !self.commit(items, self.state.is_open) {
            return CartChange::Unchanged;
        }

        let change = CartChange::Removed {
            id: removed.id,
            name: removed.name,
        };
        self.announce(&change);
        change
    }

    /// Set the quantity of `id` to `quantity`.
    ///
    /// This is an absolute set, not an adjustment. A quantity below 1 removes
    /// the item exactly as [`CartStore::remove_from_cart`] does, and one above
    /// [`MAX_LINE_QUANTITY`] is capped to it. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> CartChange {
        if quantity < 1 {
            return self.remove_from_cart(id);
        }
        let quantity = u32::try_from(quantity)
            .map_or(MAX_LINE_QUANTITY, |quantity| quantity.min(MAX_LINE_QUANTITY));
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return self.remove_from_cart(id);
        };

        let mut items = self.state.items.clone();
        let Some(item) = items.iter_mut().find(|item| &item.id == id) else {
            tracing::debug!(product_id = %id, "quantity update ignored, item not in cart");
            return CartChange::Unchanged;
        };
        item.quantity = quantity;
        if !self.commit(items, self.state.is_open) {
            return CartChange::Unchanged;
        }

        CartChange::QuantitySet {
            id: id.clone(),
            quantity: quantity.get(),
        }
    }

    /// Remove every line item.
    pub fn clear_cart(&mut self) -> CartChange {
        if !self.commit(Vec::new(), self.state.is_open) {
            return CartChange::Unchanged;
        }
        let change = CartChange::Cleared;
        self.announce(&change);
        change
    }

    /// Show the cart overlay.
    pub fn open_cart(&mut self) {
        self.set_visibility(true);
    }

    /// Hide the cart overlay.
    pub fn close_cart(&mut self) {
        self.set_visibility(false);
    }

    /// Replace the items, persist them and publish the new state.
    ///
    /// Returns `false`, leaving the cart untouched, if the items' subtotal
    /// overflows.
    fn commit(&mut self, items: Vec<LineItem>, is_open: bool) -> bool {
        let next = match CartState::new(items, is_open) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                tracing::warn!(error = %e, "cart change refused");
                return false;
            }
        };
        self.persist(next.items());
        tracing::debug!(
            items = next.items().len(),
            count = next.count(),
            subtotal = %next.subtotal(),
            "cart updated"
        );
        self.publish(next);
        true
    }

    /// Visibility changes are published but never persisted.
    fn set_visibility(&mut self, is_open: bool) {
        let next = Arc::new(CartState {
            is_open,
            ..CartState::clone(&self.state)
        });
        self.publish(next);
    }

    fn publish(&mut self, next: Arc<CartState>) {
        self.state = Arc::clone(&next);
        self.publisher.send_replace(next);
    }

    fn persist(&self, items: &[LineItem]) {
        let encoded = match snapshot::encode(items) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode cart snapshot");
                return;
            }
        };

        if let Err(e) = self.storage.write(&encoded) {
            tracing::warn!(error = %e, "failed to save cart, continuing in memory");
        }
    }

    fn announce(&self, change: &CartChange) {
        if let Some(notification) = change.notification() {
            self.notifier.notify(&notification);
        }
    }
}

/// Read the saved items, degrading to an empty cart on any problem.
fn load_items(storage: &dyn CartStorage) -> Vec<LineItem> {
    let raw = match storage.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "cart storage unreadable, starting with an empty cart");
            return Vec::new();
        }
    };

    match snapshot::decode(&raw) {
        Ok(items) => {
            tracing::debug!(items = items.len(), "restored saved cart");
            items
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed cart snapshot");
            if let Err(e) = storage.discard() {
                tracing::warn!(error = %e, "failed to discard malformed cart snapshot");
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn snapshot(id: &str, cents: u64) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Price::from_cents(cents),
            image_ref: format!("/img/{id}.jpg"),
        }
    }

    fn store_with(storage: Arc<MemoryStorage>) -> (CartStore, Arc<ToastQueue>) {
        let toasts = Arc::new(ToastQueue::new());
        let store = CartStore::open(storage, Arc::clone(&toasts) as Arc<dyn Notifier>);
        (store, toasts)
    }

    fn new_store() -> (CartStore, Arc<ToastQueue>) {
        store_with(Arc::new(MemoryStorage::new()))
    }

    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn write(&self, _snapshot: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn discard(&self) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn test_adding_same_product_twice_merges_line_items() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("x", 1000));
        store.add_to_cart(snapshot("x", 1000));

        let state = store.state();
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity(), 2);
        assert_eq!(state.count(), 2);
        assert_eq!(state.subtotal(), Price::from_cents(2000));
    }

    #[test]
    fn test_add_keeps_price_captured_at_first_add() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("x", 1000));
        store.add_to_cart(snapshot("x", 5000));

        assert_eq!(store.state().items()[0].unit_price, Price::from_cents(1000));
        assert_eq!(store.state().subtotal(), Price::from_cents(2000));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("zebra", 100));
        store.add_to_cart(snapshot("apple", 100));
        store.add_to_cart(snapshot("zebra", 100));

        let ids: Vec<_> = store.state().items().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, ["zebra", "apple"]);
    }

    #[test]
    fn test_add_always_opens_cart() {
        let (mut store, _) = new_store();
        store.close_cart();
        store.add_to_cart(snapshot("x", 100));
        assert!(store.state().is_open());
    }

    #[test]
    fn test_add_notifications() {
        let (mut store, toasts) = new_store();
        store.add_to_cart(snapshot("x", 100));
        store.add_to_cart(snapshot("x", 100));

        assert_eq!(
            toasts.drain(),
            vec![
                Notification::success("Added Product x to your cart"),
                Notification::success("Added another Product x to your cart"),
            ]
        );
    }

    #[test]
    fn test_remove_missing_item_is_silent_noop() {
        let (mut store, toasts) = new_store();
        let change = store.remove_from_cart(&ProductId::new("missing-id"));

        assert_eq!(change, CartChange::Unchanged);
        assert!(store.state().is_empty());
        assert!(toasts.drain().is_empty());
    }

    #[test]
    fn test_remove_notifies_with_item_name() {
        let (mut store, toasts) = new_store();
        store.add_to_cart(snapshot("x", 100));
        toasts.drain();

        store.remove_from_cart(&ProductId::new("x"));
        assert!(store.state().is_empty());
        assert_eq!(
            toasts.drain(),
            vec![Notification::info("Removed Product x from your cart")]
        );
    }

    #[test]
    fn test_update_quantity_zero_removes_item() {
        let (mut store, toasts) = new_store();
        store.add_to_cart(snapshot("x", 100));
        toasts.drain();

        let change = store.update_quantity(&ProductId::new("x"), 0);
        assert!(matches!(change, CartChange::Removed { .. }));
        assert!(store.state().item(&ProductId::new("x")).is_none());
        assert_eq!(toasts.drain().len(), 1);
    }

    #[test]
    fn test_update_quantity_negative_removes_item() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("x", 100));
        store.update_quantity(&ProductId::new("x"), -4);
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_update_quantity_is_absolute_and_silent() {
        let (mut store, toasts) = new_store();
        store.add_to_cart(snapshot("x", 250));
        toasts.drain();

        let change = store.update_quantity(&ProductId::new("x"), 50);
        assert_eq!(
            change,
            CartChange::QuantitySet {
                id: ProductId::new("x"),
                quantity: 50
            }
        );
        assert_eq!(store.state().count(), 50);
        assert_eq!(store.state().subtotal(), Price::from_cents(12_500));
        assert!(toasts.drain().is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_item_is_noop() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("x", 100));
        let before = store.state();

        assert_eq!(
            store.update_quantity(&ProductId::new("y"), 3),
            CartChange::Unchanged
        );
        assert_eq!(store.state(), before);
    }

    #[test]
    fn test_update_quantity_caps_at_line_limit() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("x", 1));
        store.add_to_cart(snapshot("y", 1));

        store.update_quantity(&ProductId::new("x"), i64::MAX);
        store.update_quantity(&ProductId::new("y"), i64::from(u32::MAX));

        let state = store.state();
        assert_eq!(state.items()[0].quantity(), MAX_LINE_QUANTITY);
        assert_eq!(state.items()[1].quantity(), MAX_LINE_QUANTITY);
        assert_eq!(state.count(), 2 * u64::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_add_stops_at_line_limit_but_reveals_cart() {
        let (mut store, toasts) = new_store();
        store.add_to_cart(snapshot("x", 100));
        store.update_quantity(&ProductId::new("x"), i64::from(MAX_LINE_QUANTITY));
        store.close_cart();
        toasts.drain();

        assert_eq!(store.add_to_cart(snapshot("x", 100)), CartChange::Unchanged);
        let state = store.state();
        assert_eq!(state.items()[0].quantity(), MAX_LINE_QUANTITY);
        assert!(state.is_open());
        assert!(toasts.drain().is_empty());
    }

    #[test]
    fn test_add_refused_when_subtotal_would_overflow() {
        let (mut store, toasts) = new_store();
        let mut huge = snapshot("x", 0);
        huge.unit_price = Price::new(rust_decimal::Decimal::MAX);
        store.add_to_cart(huge.clone());
        toasts.drain();

        assert_eq!(store.add_to_cart(huge), CartChange::Unchanged);
        let state = store.state();
        assert_eq!(state.items()[0].quantity(), 1);
        assert_eq!(state.subtotal(), Price::new(rust_decimal::Decimal::MAX));
        assert!(toasts.drain().is_empty());
    }

    #[test]
    fn test_clear_cart_resets_aggregates() {
        let (mut store, _) = new_store();
        store.add_to_cart(snapshot("a", 100));
        store.add_to_cart(snapshot("a", 100));
        store.add_to_cart(snapshot("b", 300));

        store.clear_cart();
        let state = store.state();
        assert!(state.items().is_empty());
        assert_eq!(state.count(), 0);
        assert_eq!(state.subtotal(), Price::zero());
    }

    #[test]
    fn test_clear_empty_cart_still_notifies() {
        let (mut store, toasts) = new_store();
        store.clear_cart();
        assert_eq!(
            toasts.drain(),
            vec![Notification::info("Your cart has been cleared")]
        );
    }

    #[test]
    fn test_open_then_close_hides_cart_regardless_of_contents() {
        let (mut store, toasts) = new_store();
        store.add_to_cart(snapshot("a", 100));
        toasts.drain();

        store.open_cart();
        assert!(store.state().is_open());
        store.close_cart();
        assert!(!store.state().is_open());
        assert_eq!(store.state().count(), 1);
        assert!(toasts.drain().is_empty());
    }

    #[test]
    fn test_changes_are_persisted_and_rehydrated() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut store, _) = store_with(Arc::clone(&storage));
        store.add_to_cart(snapshot("a", 100));
        store.add_to_cart(snapshot("b", 250));
        store.update_quantity(&ProductId::new("b"), 4);

        let (reopened, _) = store_with(storage);
        assert_eq!(reopened.state().items(), store.state().items());
        assert!(!reopened.state().is_open());
    }

    #[test]
    fn test_visibility_is_not_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut store, _) = store_with(Arc::clone(&storage));
        store.open_cart();
        assert_eq!(storage.read().unwrap(), None);
    }

    #[test]
    fn test_malformed_snapshot_degrades_to_empty_and_is_discarded() {
        let storage = Arc::new(MemoryStorage::with_snapshot("[{\"id\":"));
        let (store, toasts) = store_with(Arc::clone(&storage));

        assert!(store.state().is_empty());
        assert_eq!(storage.read().unwrap(), None);
        assert!(toasts.drain().is_empty());
    }

    #[test]
    fn test_overflowing_snapshot_degrades_to_empty_and_is_discarded() {
        let raw = r#"[{"id":"a","name":"A","unitPrice":"79228162514264337593543950335","imageRef":"/a.jpg","quantity":2}]"#;
        let storage = Arc::new(MemoryStorage::with_snapshot(raw));
        let (store, _) = store_with(Arc::clone(&storage));

        assert!(store.state().is_empty());
        assert_eq!(store.state().subtotal(), Price::zero());
        assert_eq!(storage.read().unwrap(), None);
    }

    #[test]
    fn test_unavailable_storage_keeps_cart_in_memory() {
        let mut store = CartStore::open(Arc::new(BrokenStorage), Arc::new(NoopNotifier));
        store.add_to_cart(snapshot("a", 100));
        store.add_to_cart(snapshot("a", 100));
        assert_eq!(store.state().count(), 2);
    }

    #[test]
    fn test_subscribers_see_consolidated_state() {
        let (mut store, _) = new_store();
        let mut rx = store.subscribe();

        store.add_to_cart(snapshot("a", 150));
        assert!(rx.has_changed().unwrap());

        let seen = rx.borrow_and_update();
        assert_eq!(seen.count(), 1);
        assert_eq!(seen.subtotal(), Price::from_cents(150));
        assert_eq!(seen.items().len(), 1);
        assert!(seen.is_open());
    }

    #[test]
    fn test_change_notifications_without_store() {
        assert_eq!(
            CartChange::QuantitySet {
                id: ProductId::new("a"),
                quantity: 3
            }
            .notification(),
            None
        );
        assert_eq!(CartChange::Unchanged.notification(), None);
        assert_eq!(
            CartChange::Cleared.notification().map(|n| n.kind),
            Some(NotifyKind::Info)
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize),
            Remove(usize),
            Update(usize, i64),
            Clear,
            Open,
            Close,
        }

        const IDS: [&str; 4] = ["a", "b", "c", "d"];
        const CENTS: [u64; 4] = [199, 1000, 2550, 5];

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0..IDS.len()).prop_map(Op::Add),
                2 => (0..IDS.len()).prop_map(Op::Remove),
                3 => (0..IDS.len(), -2_i64..6).prop_map(|(i, q)| Op::Update(i, q)),
                1 => Just(Op::Clear),
                1 => Just(Op::Open),
                1 => Just(Op::Close),
            ]
        }

        fn apply(store: &mut CartStore, op: &Op) {
            match *op {
                Op::Add(i) => {
                    store.add_to_cart(snapshot(IDS[i], CENTS[i]));
                }
                Op::Remove(i) => {
                    store.remove_from_cart(&ProductId::new(IDS[i]));
                }
                Op::Update(i, q) => {
                    store.update_quantity(&ProductId::new(IDS[i]), q);
                }
                Op::Clear => {
                    store.clear_cart();
                }
                Op::Open => store.open_cart(),
                Op::Close => store.close_cart(),
            }
        }

        proptest! {
            #[test]
            fn prop_aggregates_match_items(ops in prop::collection::vec(op(), 0..40)) {
                let (mut store, _) = new_store();
                for op in &ops {
                    apply(&mut store, op);
                    let state = store.state();
                    let count: u64 = state.items().iter().map(|i| u64::from(i.quantity())).sum();
                    let subtotal: Price = state.items().iter().map(LineItem::line_total).sum();
                    prop_assert_eq!(state.count(), count);
                    prop_assert_eq!(state.subtotal(), subtotal);
                }
            }

            #[test]
            fn prop_ids_stay_unique(ops in prop::collection::vec(op(), 0..40)) {
                let (mut store, _) = new_store();
                for op in &ops {
                    apply(&mut store, op);
                    let state = store.state();
                    let mut ids: Vec<_> = state.items().iter().map(|i| i.id.clone()).collect();
                    ids.sort();
                    ids.dedup();
                    prop_assert_eq!(ids.len(), state.items().len());
                }
            }

            #[test]
            fn prop_persisted_cart_matches_live_cart(ops in prop::collection::vec(op(), 0..40)) {
                let storage = Arc::new(MemoryStorage::new());
                let (mut store, _) = store_with(Arc::clone(&storage));
                for op in &ops {
                    apply(&mut store, op);
                }
                let (reopened, _) = store_with(storage);
                let (live, restored) = (store.state(), reopened.state());
                prop_assert_eq!(restored.items(), live.items());
            }
        }
    }
}
