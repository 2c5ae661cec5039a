//! CLI command implementations.
//!
//! Commands report through `tracing` at info level, one line per record.

pub mod cart;
pub mod products;

use std::path::PathBuf;
use std::sync::Arc;

use mercadito_core::{Product, ProductId};
use mercadito_storefront::cart::{Cart, CartError, CartObserver, FileStore, added_message};
use mercadito_storefront::catalog::{AnySource, Catalog, CatalogError, RetryPolicy};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart could not be persisted.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// No product with this id in the catalog.
    #[error("No product with id {0}")]
    UnknownProduct(ProductId),
}

/// Where the catalog and the cart live.
#[derive(Debug, Clone)]
pub struct Context {
    pub source: AnySource,
    pub retry: RetryPolicy,
    pub data_dir: PathBuf,
}

impl Context {
    /// Fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Catalog`] once every attempt has failed.
    pub async fn catalog(&self) -> Result<Catalog, CommandError> {
        let mut catalog = Catalog::new();
        catalog.load_with_retry(&self.source, self.retry).await?;
        Ok(catalog)
    }

    /// Open the persisted cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        Cart::new(
            Arc::new(FileStore::new(&self.data_dir)),
            Arc::new(ConsoleObserver),
        )
    }
}

/// Reports cart confirmations on the console.
struct ConsoleObserver;

impl CartObserver for ConsoleObserver {
    fn product_added(&self, product: &Product) {
        tracing::info!("{}", added_message(product));
    }
}
