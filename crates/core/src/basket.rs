//! Per-session basket of product snapshots.
//!
//! A [`Basket`] is an ordered list of [`Product`] copies. Adding the same
//! product twice keeps two line items; removal takes out the first match
//! only. The basket itself has no idea where it lives: the storefront loads
//! it from the session at the start of a request and writes it back at the
//! end.
//!
//! # Checkout
//!
//! ```text
//!   Idle ──checkout()──▶ CheckedOut   (basket had items: receipt returned, basket emptied)
//!     │
//!     └──checkout()──▶ Rejected       (basket was empty: error returned, nothing changes)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, Product, ProductId};

/// Errors from the checkout transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("the basket is empty")]
    EmptyBasket,
}

/// Ordered collection of product snapshots pending checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basket {
    items: Vec<Product>,
}

/// Immutable record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// The basket contents at the moment of checkout.
    pub items: Vec<Product>,
    /// Sum of `items` prices.
    pub total: Price,
}

impl Basket {
    /// Create an empty basket.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a product snapshot to the end of the basket.
    pub fn add(&mut self, product: Product) {
        self.items.push(product);
    }

    /// Remove the first item with the given identifier.
    ///
    /// Returns the removed product, or `None` when nothing matched. A miss
    /// leaves the basket untouched.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Sum of the prices of all items, zero for an empty basket.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| &item.price).sum()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of line items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the basket holds no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Iterate over the items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    /// Check out the basket.
    ///
    /// The total and the item snapshot are taken before the basket is
    /// emptied, and both happen within this call, so a caller never sees a
    /// cleared basket without the matching receipt.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyBasket` if there is nothing to buy. The
    /// basket is left as it was.
    pub fn checkout(&mut self) -> Result<Receipt, CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyBasket);
        }

        let total = self.total();
        let items = std::mem::take(&mut self.items);
        Ok(Receipt { items, total })
    }
}

impl<'a> IntoIterator for &'a Basket {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Product> for Basket {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
