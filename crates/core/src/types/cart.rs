//! The shopper's cart.
//!
//! `Cart` is an ordered list of entries keyed by product ID. Transformations
//! never mutate in place; they return the next snapshot, so a caller can
//! persist it first and only then make it current.
//!
//! # Invariants
//!
//! - Product IDs are unique within a cart.
//! - Every entry has `amount >= 1`. Dropping to zero means removal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};

use super::{Price, Product, ProductId};

/// A product plus the quantity selected for purchase.
///
/// Serialized flat (`{"id":1,"title":"…","price":179.9,"image":"…","amount":2}`),
/// which is the stored cart format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartEntry {
    /// A fresh entry with quantity 1.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    /// Product ID of this entry.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// Ordered collection of cart entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, enforcing the invariants.
    ///
    /// Zero-quantity entries are dropped and only the first entry for each
    /// product ID is kept.
    #[must_use]
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let entries = entries
            .into_iter()
            .filter(|entry| entry.amount > 0 && seen.insert(entry.id()))
            .collect();
        Self { entries }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry for a product.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Quantity selected for a product, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.find(id).map(|entry| entry.amount)
    }

    /// Next snapshot with `product` appended at quantity 1.
    ///
    /// Returns `None` if the product is already in the cart.
    #[must_use]
    pub fn with_product(&self, product: Product) -> Option<Self> {
        if self.contains(product.id) {
            return None;
        }
        let mut entries = self.entries.clone();
        entries.push(CartEntry::new(product));
        Some(Self { entries })
    }

    /// Next snapshot with the quantity of `id` set to `amount`.
    ///
    /// Returns `None` if the product is not in the cart or `amount` is zero.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.id() == id {
                    CartEntry {
                        product: entry.product.clone(),
                        amount,
                    }
                } else {
                    entry.clone()
                }
            })
            .collect();
        Some(Self { entries })
    }

    /// Next snapshot with the entry for `id` removed.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.id() != id)
            .cloned()
            .collect();
        Some(Self { entries })
    }

    /// Sum of all quantities (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }
}
