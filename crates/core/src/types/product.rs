//! Catalog products and the snapshots captured from them.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    /// Primary image URL.
    pub image: String,
    /// Optional gallery; the product page falls back to `image` alone.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Capture the display and pricing data a cart line item needs.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            image_ref: self.image.clone(),
        }
    }

    /// All gallery images, primary image first, without duplicates.
    #[must_use]
    pub fn gallery(&self) -> Vec<&str> {
        let mut gallery = vec![self.image.as_str()];
        for image in &self.images {
            if !gallery.contains(&image.as_str()) {
                gallery.push(image);
            }
        }
        gallery
    }
}

/// Price, name and image of a product at the moment it is added to a cart.
///
/// Later catalog changes do not affect a snapshot already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product {
            id: ProductId::new("lamp"),
            name: "Arc Lamp".to_string(),
            price: Price::from_cents(8900),
            category: "Home".to_string(),
            image: "/img/lamp.jpg".to_string(),
            images: vec!["/img/lamp.jpg".to_string(), "/img/lamp-2.jpg".to_string()],
            description: String::new(),
            featured: true,
        }
    }

    #[test]
    fn test_snapshot_copies_display_fields() {
        let snapshot = lamp().snapshot();
        assert_eq!(snapshot.id, ProductId::new("lamp"));
        assert_eq!(snapshot.name, "Arc Lamp");
        assert_eq!(snapshot.unit_price, Price::from_cents(8900));
        assert_eq!(snapshot.image_ref, "/img/lamp.jpg");
    }

    #[test]
    fn test_gallery_dedupes_primary_image() {
        assert_eq!(lamp().gallery(), vec!["/img/lamp.jpg", "/img/lamp-2.jpg"]);
    }
}
