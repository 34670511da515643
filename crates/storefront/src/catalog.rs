//! Read-only product catalog.
//!
//! The catalog is loaded once at startup, either from the JSON bundled with
//! the crate or from a file named by `STOREFRONT_CATALOG_PATH`, and never
//! changes afterwards. Carts snapshot product data when items are added, so
//! nothing here is consulted for items already in a cart.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use driftwood_core::{Product, ProductId};
use thiserror::Error;

/// Catalog bundled with the storefront.
pub const DEFAULT_CATALOG: &str = include_str!("../data/products.json");

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Number of featured products shown on the home page.
pub const HOME_FEATURED_LIMIT: usize = 4;

/// Number of related products shown on a product page.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog lists product {0} more than once")]
    DuplicateProduct(ProductId),
}

/// Ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Featured products first, catalog order otherwise.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    /// Most recently listed first (reverse catalog order).
    Newest,
}

impl ProductSort {
    pub const ALL: [Self; 4] = [Self::Featured, Self::PriceAsc, Self::PriceDesc, Self::Newest];

    /// Parse a query-string value, falling back to `Featured`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "newest" => Self::Newest,
            _ => Self::Featured,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Newest => "Newest",
        }
    }
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateProduct` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON, negative prices or duplicate ids.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(raw)?)
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is invalid.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Every product in catalog order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Up to `limit` featured products, in catalog order.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.featured)
            .take(limit)
            .collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products in `category`; [`ALL_CATEGORIES`] matches everything.
    #[must_use]
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| category == ALL_CATEGORIES || product.category == category)
            .collect()
    }

    /// Up to `limit` other products from the same category as `product`.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(limit)
            .collect()
    }

    /// Products in `category`, ordered by `sort`.
    #[must_use]
    pub fn browse(&self, category: &str, sort: ProductSort) -> Vec<&Product> {
        let mut products = self.in_category(category);
        match sort {
            // Stable sorts keep catalog order among equal keys.
            ProductSort::Featured => products.sort_by_key(|product| !product.featured),
            ProductSort::PriceAsc => products.sort_by_key(|product| product.price),
            ProductSort::PriceDesc => {
                products.sort_by_key(|product| std::cmp::Reverse(product.price));
            }
            ProductSort::Newest => products.reverse(),
        }
        products
    }
}
