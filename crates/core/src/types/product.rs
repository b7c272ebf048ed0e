//! Product snapshots.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as stored in the catalog index.
///
/// Values are full copies: a product held in a basket does not change when
/// the index document is later updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            flavour: None,
            product_type: None,
            price,
            image_url: None,
        }
    }

    /// Set the flavour.
    #[must_use]
    pub fn with_flavour(mut self, flavour: impl Into<String>) -> Self {
        self.flavour = Some(flavour.into());
        self
    }

    /// Set the product type (category).
    #[must_use]
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
