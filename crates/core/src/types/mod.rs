//! Core types for Driftwood.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{LineItem, MAX_LINE_QUANTITY, cart_count, cart_subtotal};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Product, ProductSnapshot};
