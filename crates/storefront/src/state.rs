//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::inventory::{HttpInventoryApi, InventoryApi};
use crate::notify::{Notifier, TracingNotifier};
use crate::services::cart::CartStore;
use crate::storage::{CartStorage, FileStorage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers the one
/// `CartStore` built at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: CartStore,
}

impl AppState {
    /// Create the application state with the production collaborators:
    /// HTTP inventory client, file storage, and log notifications.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let api: Arc<dyn InventoryApi> = Arc::new(HttpInventoryApi::new(&config.inventory));
        let storage: Arc<dyn CartStorage> = Arc::new(FileStorage::new(config.storage.dir.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        let cart = CartStore::load(api, storage, notifier, config.storage.key.clone());

        Self::with_cart(cart)
    }

    /// Create the application state around an already-built cart store.
    #[must_use]
    pub fn with_cart(cart: CartStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cart }),
        }
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
