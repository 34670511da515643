//! JSON encoding of the persisted cart.
//!
//! The stored form is a bare array of line items:
//!
//! ```json
//! [{"id":"linen-throw","name":"Linen Throw","unitPrice":"89.00","imageRef":"/img/throw.jpg","quantity":2}]
//! ```
//!
//! There is no version field. Anything that does not decode into a valid
//! cart is reported as malformed and the caller starts from an empty cart.

use std::collections::HashSet;

use driftwood_core::{LineItem, MAX_LINE_QUANTITY, ProductId, cart_subtotal};
use thiserror::Error;

/// Reasons a stored snapshot is rejected.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid cart snapshot: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("cart snapshot contains product {0} more than once")]
    DuplicateItem(ProductId),
    #[error("cart snapshot holds {quantity} units of {id}, above the line limit")]
    QuantityTooLarge { id: ProductId, quantity: u32 },
    #[error("cart snapshot subtotal is too large to represent")]
    SubtotalOverflow,
}

/// Serialize `items` in order.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parse a stored snapshot, preserving item order.
///
/// # Errors
///
/// Returns `SnapshotError::Invalid` for malformed JSON, missing fields,
/// negative prices or zero quantities, `SnapshotError::DuplicateItem` if the
/// same product id appears twice, `SnapshotError::QuantityTooLarge` for a line
/// above [`MAX_LINE_QUANTITY`] and `SnapshotError::SubtotalOverflow` if the
/// items' subtotal can't be represented.
pub fn decode(raw: &str) -> Result<Vec<LineItem>, SnapshotError> {
    let items: Vec<LineItem> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(&item.id) {
            return Err(SnapshotError::DuplicateItem(item.id.clone()));
        }
        if item.quantity() > MAX_LINE_QUANTITY {
            return Err(SnapshotError::QuantityTooLarge {
                id: item.id.clone(),
                quantity: item.quantity(),
            });
        }
    }

    if cart_subtotal(&items).is_none() {
        return Err(SnapshotError::SubtotalOverflow);
    }

    Ok(items)
}
