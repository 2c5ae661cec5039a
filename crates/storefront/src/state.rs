//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use tokio::task::JoinHandle;

use crate::cart::{Cart, CartStore, FileStore};
use crate::catalog::{self, Catalog};
use crate::config::StorefrontConfig;
use crate::notify::ToastQueue;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and owns the one catalog and
/// the one cart of the running storefront. Locks are only ever held for a
/// single synchronous operation, never across an `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: RwLock<Catalog>,
    cart: Mutex<Cart>,
    toasts: Arc<ToastQueue>,
}

impl AppState {
    /// Create the application state, restoring the cart from the data directory.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = Arc::new(FileStore::new(&config.data_dir));
        Self::with_store(config, store)
    }

    /// Create the application state with an explicit cart store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: Arc<dyn CartStore>) -> Self {
        let toasts = Arc::new(ToastQueue::new());
        let cart = Cart::new(store, toasts.clone());
        let totals = cart.totals();
        tracing::info!(
            items = totals.items,
            total = %totals.price,
            "Cart restored"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: RwLock::new(Catalog::new()),
                cart: Mutex::new(cart),
                toasts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Read access to the catalog.
    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the cart.
    pub fn cart(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pending toast messages.
    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.inner.toasts
    }

    /// Fetch the catalog and install it.
    ///
    /// The fetch runs without holding the catalog lock, so requests keep
    /// being served (against the empty catalog) while it is in flight.
    pub async fn load_catalog(&self) {
        let config = self.config();
        let result = catalog::fetch_with_retry(&config.catalog, config.catalog_retry).await;

        let mut catalog = self
            .inner
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(products) => {
                let count = catalog.install(products).len();
                tracing::info!(products = count, "Catalog ready");
            }
            Err(e) => {
                tracing::error!(error = %e, "Catalog load failed, storefront will show no products");
                catalog.fail(&e);
            }
        }
    }

    /// Start loading the catalog in the background.
    pub fn start_catalog_load(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move { state.load_catalog().await })
    }
}
