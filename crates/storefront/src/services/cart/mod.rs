//! Cart store: the shopper's cart, its persistence, and stock validation.
//!
//! # Flow
//!
//! ```text
//! UI action -> CartStore op -> (stock/product fetch) -> next snapshot
//!           -> storage write -> snapshot becomes current
//! ```
//!
//! # Ordering
//!
//! - `add_product` checks cart membership first; only products not yet in the
//!   cart hit the inventory API for stock and details.
//! - Every stock check happens before any mutation.
//! - `remove_product` never calls the inventory API.
//!
//! # Concurrency
//!
//! Operations are not serialized. Each one reads the current snapshot, may
//! await the network, then commits a whole new snapshot. Two racing
//! operations both start from the same snapshot and the later commit wins.
//! Commits themselves are serialized: the storage write and the swap happen
//! under the write lock, so storage and memory never disagree.
//!
//! # Failures
//!
//! Every operation returns `Result<Cart, CartError>` and, on failure, also
//! emits a [`Notification`](crate::notify::Notification) through the
//! injected [`Notifier`]. The cart is never partially updated.

mod error;

pub use error::CartError;

use std::sync::Arc;

use rocketshoes_core::{Cart, CartEntry, ProductId};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::inventory::InventoryApi;
use crate::notify::Notifier;
use crate::storage::{CartStorage, StorageError};

/// Owner of the in-memory cart.
///
/// Storage is a mirror: it is written after every successful mutation and
/// read only once, in [`CartStore::load`].
pub struct CartStore {
    api: Arc<dyn InventoryApi>,
    storage: Arc<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
    key: String,
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Build a store, restoring the cart saved under `key`.
    ///
    /// A missing slot, unreadable storage, or malformed JSON all start an
    /// empty cart.
    pub fn load(
        api: Arc<dyn InventoryApi>,
        storage: Arc<dyn CartStorage>,
        notifier: Arc<dyn Notifier>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let cart = read_stored_cart(storage.as_ref(), &key);
        info!(key = %key, items = cart.len(), "Cart restored from storage");

        Self {
            api,
            storage,
            notifier,
            key,
            cart: RwLock::new(cart),
        }
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its
    /// quantity plus one. A new product needs available stock and its details
    /// from the inventory API, and enters the cart at quantity 1.
    ///
    /// # Errors
    ///
    /// `OutOfStock` if no unit is available, `AddFailed` if the inventory API
    /// fails, plus any error of `update_product_amount` for products already
    /// in the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let result = self.try_add_product(product_id).await;
        self.report(result)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// `NotInCart` if the product is absent, `Storage` if saving fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let result = self.try_remove_product(product_id).await;
        self.report(result)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Setting the quantity of a product that is not in the cart changes
    /// nothing and is not an error.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` for `amount <= 0`, `OutOfStock` if the stock record
    /// is missing or smaller than `amount`, `UpdateFailed` if the inventory
    /// API fails, `Storage` if saving fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Cart, CartError> {
        let result = self.try_update_product_amount(product_id, amount).await;
        self.report(result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let snapshot = self.cart().await;

        if let Some(current) = snapshot.quantity_of(product_id) {
            debug!(current, "Product already in cart, incrementing");
            return self
                .try_update_product_amount(product_id, i64::from(current) + 1)
                .await;
        }

        let add_failed = |source| CartError::AddFailed { product_id, source };

        let stock = self.api.stock(product_id).await.map_err(add_failed)?;
        if !stock.is_some_and(|s| s.is_available()) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: 1,
                available: stock.map(|s| s.amount),
            });
        }

        let product = self.api.product(product_id).await.map_err(add_failed)?;

        match snapshot.with_product(product) {
            Some(next) => self.commit(next).await,
            None => Ok(snapshot),
        }
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let next = self
            .cart()
            .await
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(next).await
    }

    async fn try_update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Cart, CartError> {
        if amount <= 0 {
            return Err(CartError::InvalidQuantity { product_id, amount });
        }

        let snapshot = self.cart().await;

        let stock = self
            .api
            .stock(product_id)
            .await
            .map_err(|source| CartError::UpdateFailed { product_id, source })?;

        let out_of_stock = || CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.map(|s| s.amount),
        };

        if !stock.is_some_and(|s| s.covers(amount)) {
            return Err(out_of_stock());
        }
        let quantity = u32::try_from(amount).map_err(|_| out_of_stock())?;

        match snapshot.with_amount(product_id, quantity) {
            Some(next) => self.commit(next).await,
            None => {
                debug!("Product not in cart, nothing to update");
                Ok(snapshot)
            }
        }
    }

    /// Persist `next`, then make it the current cart.
    ///
    /// The write lock is held across the storage write and the swap so
    /// storage always mirrors memory. If the write fails the current cart is
    /// left as it was.
    async fn commit(&self, next: Cart) -> Result<Cart, CartError> {
        let json = serde_json::to_string(&next).map_err(StorageError::from)?;

        let mut current = self.cart.write().await;
        self.storage.set_item(&self.key, &json)?;
        *current = next.clone();
        drop(current);

        info!(
            items = next.len(),
            quantity = next.total_quantity(),
            "Cart saved"
        );
        Ok(next)
    }

    /// Emit a notification for a failed operation.
    fn report(&self, result: Result<Cart, CartError>) -> Result<Cart, CartError> {
        if let Err(e) = &result {
            warn!(error = %e, kind = e.kind().as_str(), "Cart operation failed");
            self.notifier.notify(&e.notification());
        }
        result
    }
}

/// Read and validate the stored cart; anything unusable yields an empty cart.
fn read_stored_cart(storage: &dyn CartStorage, key: &str) -> Cart {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, "Could not read stored cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Vec<CartEntry>>(&raw) {
        Ok(entries) => {
            let stored = entries.len();
            let cart = Cart::from_entries(entries);
            if cart.len() != stored {
                warn!(
                    dropped = stored - cart.len(),
                    "Dropped duplicate or zero-quantity entries from stored cart"
                );
            }
            cart
        }
        Err(e) => {
            warn!(error = %e, "Stored cart is malformed, starting empty");
            Cart::new()
        }
    }
}
