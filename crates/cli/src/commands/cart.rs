//! Local cart commands.
//!
//! Each invocation opens the cart file through the same [`CartStore`] the
//! storefront uses, applies one operation and prints the result.

use std::path::Path;
use std::sync::Arc;

use driftwood_core::ProductId;
use driftwood_storefront::cart::{CartState, CartStore, FileStorage, TracingNotifier};
use driftwood_storefront::catalog::Catalog;

/// Open the cart stored at `path`.
pub fn open(path: &Path) -> CartStore {
    tracing::debug!(path = %path.display(), "opening cart file");
    CartStore::open(Arc::new(FileStorage::at(path)), Arc::new(TracingNotifier))
}

/// Add `quantity` units of a catalog product, one at a time.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog.
pub fn add(
    store: &mut CartStore,
    catalog: &Catalog,
    id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::new(id);
    let product = catalog
        .find(&id)
        .ok_or_else(|| format!("unknown product: {id}"))?;

    let snapshot = product.snapshot();
    for _ in 0..quantity {
        store.add_to_cart(snapshot.clone());
    }
    Ok(())
}

/// Set a line item's quantity.
pub fn set(store: &mut CartStore, id: &str, quantity: i64) {
    store.update_quantity(&ProductId::new(id), quantity);
}

/// Remove a line item.
pub fn remove(store: &mut CartStore, id: &str) {
    store.remove_from_cart(&ProductId::new(id));
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show(store: &CartStore) {
    print!("{}", render(&store.state()));
}

/// Line items followed by the item count and subtotal.
pub fn render(state: &CartState) -> String {
    if state.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut output: String = state
        .items()
        .iter()
        .map(|item| {
            format!(
                "{:<22} {:<28} {:>3} x {:>9} = {:>10}\n",
                item.id.as_str(),
                item.name,
                item.quantity(),
                item.unit_price.display(),
                item.line_total().display()
            )
        })
        .collect();

    let noun = if state.count() == 1 { "item" } else { "items" };
    output.push_str(&format!(
        "{} {noun}, subtotal {}\n",
        state.count(),
        state.subtotal().display()
    ));
    output
}
