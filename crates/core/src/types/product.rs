//! Catalog records served by the inventory API.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Product detail as returned by `GET /products/{id}`.
///
/// Immutable once fetched, which is what makes it safe to cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
}

/// Available quantity for a product, as returned by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.amount > 0
    }

    /// Whether `quantity` units can be taken from this stock.
    #[must_use]
    pub fn covers(&self, quantity: i64) -> bool {
        quantity <= i64::from(self.amount)
    }
}
