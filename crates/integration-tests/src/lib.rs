//! Integration tests for Mercadito.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mercadito-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart mutations, totals and persistence across sessions
//! - `catalog_queries` - Catalog loading and lookups
//! - `storefront_routes` - HTTP routes driven through the router without a socket
//!
//! This crate holds the fixtures shared by those tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use mercadito_core::{Price, Product, ProductId};

/// The two-product catalog used throughout the cart scenarios.
pub const SMALL_CATALOG: &str = r#"[
    {"id": 1, "name": "Mouse", "price": 10, "category": "Tech", "image": false},
    {"id": 2, "name": "Mug", "price": 5, "category": "Home", "image": "mug.jpg"}
]"#;

/// A larger catalog for query tests.
pub const SHOP_CATALOG: &str = r#"[
    {"id": 1, "name": "Wireless Mouse", "price": 24.99, "category": "Tech", "image": "mouse.jpg"},
    {"id": 2, "name": "Ceramic Mug", "price": 9.50, "category": "Home", "image": false},
    {"id": 3, "name": "Mechanical Keyboard", "price": 89.00, "category": "Tech"},
    {"id": 4, "name": "Wool Scarf", "price": 19.90, "category": "Clothing", "image": null},
    {"id": 5, "name": "mouse pad", "price": 7, "category": "tech"}
]"#;

/// The "Mouse" product of [`SMALL_CATALOG`].
#[must_use]
pub fn mouse() -> Product {
    Product::new(ProductId::new(1), "Mouse", Price::from_units(10), "Tech")
}

/// The "Mug" product of [`SMALL_CATALOG`].
#[must_use]
pub fn mug() -> Product {
    Product::new(ProductId::new(2), "Mug", Price::from_units(5), "Home").with_image("mug.jpg")
}

/// Write `contents` to `products.json` inside `dir` and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn write_catalog(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("products.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}
