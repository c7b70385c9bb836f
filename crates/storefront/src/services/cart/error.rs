//! Cart operation error types.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::inventory::ApiError;
use crate::notify::{Notification, NotificationKind};
use crate::storage::StorageError;

/// Errors that can occur during cart operations.
///
/// Every variant leaves the cart exactly as it was before the operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested quantity exceeds the available stock, or there is no stock record.
    #[error("product {product_id} out of stock (requested {requested}, available {})", .available.map_or_else(|| "none".to_string(), |a| a.to_string()))]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: Option<u32>,
    },

    /// Requested quantity is zero or negative.
    #[error("invalid quantity {amount} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, amount: i64 },

    /// Inventory lookup failed while adding a new product.
    #[error("failed to add product {product_id}: {source}")]
    AddFailed {
        product_id: ProductId,
        #[source]
        source: ApiError,
    },

    /// Inventory lookup failed while changing a quantity.
    #[error("failed to update product {product_id}: {source}")]
    UpdateFailed {
        product_id: ProductId,
        #[source]
        source: ApiError,
    },

    /// The new cart could not be persisted.
    #[error("failed to save cart: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Failure class shown to the shopper.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::NotInCart(_) => NotificationKind::RemoveFailed,
            Self::OutOfStock { .. } => NotificationKind::OutOfStock,
            Self::InvalidQuantity { .. } => NotificationKind::InvalidQuantity,
            Self::AddFailed { .. } => NotificationKind::AddFailed,
            Self::UpdateFailed { .. } => NotificationKind::UpdateFailed,
            Self::Storage(_) => NotificationKind::StorageFailed,
        }
    }

    /// Notification to emit for this failure.
    #[must_use]
    pub fn notification(&self) -> Notification {
        self.kind().into()
    }
}
