//! Cart line items and their aggregates.
//!
//! A line item's quantity is a `NonZeroU32`: an item whose quantity would
//! drop to zero is removed from the cart instead of being kept at zero. The
//! cart never holds more than [`MAX_LINE_QUANTITY`] units of one product.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::ProductSnapshot;

/// Most units of a single product a cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// One product the shopper intends to buy, at a given quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_ref: String,
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// A new line item for `snapshot` with quantity 1.
    #[must_use]
    pub fn from_snapshot(snapshot: ProductSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            unit_price: snapshot.unit_price,
            image_ref: snapshot.image_ref,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `unit_price × quantity`, saturating on overflow.
    ///
    /// Carts only hold items whose [`cart_subtotal`] fits, so within a cart
    /// this is exact.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity())
    }
}

/// Total number of units across `items`.
#[must_use]
pub fn cart_count(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}

/// Sum of every line total in `items`, or `None` if it overflows.
#[must_use]
pub fn cart_subtotal(items: &[LineItem]) -> Option<Price> {
    items.iter().try_fold(Price::zero(), |total, item| {
        total.checked_add(item.unit_price.checked_times(item.quantity())?)
    })
}
