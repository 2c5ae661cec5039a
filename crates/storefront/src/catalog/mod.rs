//! Product catalog.
//!
//! # Architecture
//!
//! - The catalog is fetched once at startup from a [`CatalogSource`]
//! - After loading it is read-only; every query is a pure read over the list
//! - A failed load leaves the list as it was (empty at startup) and records
//!   the failure in [`LoadState`] so the storefront can show it
//!
//! # Example
//!
//! ```rust,ignore
//! use mercadito_storefront::catalog::{Catalog, FileSource, RetryPolicy};
//!
//! let mut catalog = Catalog::new();
//! catalog
//!     .load_with_retry(&FileSource::new("data/products.json"), RetryPolicy::default())
//!     .await?;
//!
//! let mugs: Vec<_> = catalog.find_by_name_contains("mug").collect();
//! ```

mod source;

use std::time::Duration;

use mercadito_core::{Product, ProductId};
use thiserror::Error;
use tracing::{info, warn};

pub use source::{AnySource, CatalogSource, FileSource, HttpSource};

/// Errors that can occur while fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog endpoint answered with a non-success status.
    #[error("catalog source returned HTTP {0}")]
    Status(u16),

    /// Reading a local catalog file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The payload was not a list of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source location could not be understood.
    #[error("invalid catalog source {0}: {1}")]
    InvalidSource(String, String),
}

/// Outcome of the catalog load, as far as the storefront knows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The fetch has not finished yet.
    #[default]
    Pending,
    /// Products are available.
    Ready,
    /// Every attempt failed; the message describes the last error.
    Failed(String),
}

/// How often and how patiently to retry a failed catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `attempts` is clamped to at least one.
    #[must_use]
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// A policy that tries exactly once.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Pause between attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Fetch the product list, retrying failures according to `policy`.
///
/// # Errors
///
/// Returns the error of the last attempt when every attempt fails.
pub async fn fetch_with_retry<S: CatalogSource>(
    source: &S,
    policy: RetryPolicy,
) -> Result<Vec<Product>, CatalogError> {
    let mut attempt = 1;
    loop {
        match source.fetch().await {
            Ok(products) => {
                info!(
                    source = %source.describe(),
                    products = products.len(),
                    attempt,
                    "Catalog fetched"
                );
                return Ok(products);
            }
            Err(e) if attempt < policy.attempts => {
                warn!(
                    source = %source.describe(),
                    attempt,
                    max_attempts = policy.attempts,
                    error = %e,
                    "Catalog fetch failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// The in-memory product catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    state: LoadState,
}

impl Catalog {
    /// Create an empty catalog in the [`LoadState::Pending`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the product list once and replace the stored list with it.
    ///
    /// # Errors
    ///
    /// Propagates the source error. The stored list is left untouched and
    /// the catalog moves to [`LoadState::Failed`].
    pub async fn load<S: CatalogSource>(&mut self, source: &S) -> Result<&[Product], CatalogError> {
        self.load_with_retry(source, RetryPolicy::once()).await
    }

    /// Like [`Catalog::load`], retrying failures according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns the last error once every attempt has failed.
    pub async fn load_with_retry<S: CatalogSource>(
        &mut self,
        source: &S,
        policy: RetryPolicy,
    ) -> Result<&[Product], CatalogError> {
        match fetch_with_retry(source, policy).await {
            Ok(products) => Ok(self.install(products)),
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Replace the stored list with an already fetched one.
    pub fn install(&mut self, products: Vec<Product>) -> &[Product] {
        self.products = products;
        self.state = LoadState::Ready;
        &self.products
    }

    /// Record a failed load without touching the stored list.
    pub fn fail(&mut self, error: &CatalogError) {
        self.state = LoadState::Failed(error.to_string());
    }

    /// Current load state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether no products are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The product with the given id.
    ///
    /// Ids are assumed unique; with duplicates the first match wins.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products whose name contains `substring`, ignoring case.
    ///
    /// An empty substring matches every product.
    pub fn find_by_name_contains<'a>(
        &'a self,
        substring: &str,
    ) -> impl Iterator<Item = &'a Product> + use<'a> {
        let needle = substring.to_lowercase();
        self.products
            .iter()
            .filter(move |p| p.name_contains_lowercase(&needle))
    }

    /// Products whose category label equals `category` exactly.
    pub fn find_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Distinct category labels in the order they first appear.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for product in &self.products {
            if !labels.contains(&product.category.as_str()) {
                labels.push(&product.category);
            }
        }
        labels
    }
}
