//! Wire types for index responses and their conversion into [`Product`].
//!
//! The index keeps a document's identifier out of the stored source, so
//! every conversion takes the `_id` alongside the `_source`.
//!
//! Sources are decoded one document at a time. A document that does not
//! hold a valid product (no name, negative price) is logged and skipped
//! instead of failing the whole response.

use serde::Deserialize;
use serde_json::Value;

use scoop_core::{Price, Product, ProductId};

/// Response body of `POST /{index}/_search`.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub(super) struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Value,
}

/// Response body of `GET /{index}/_doc/{id}`.
#[derive(Debug, Deserialize)]
pub(super) struct GetResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub found: bool,
    #[serde(rename = "_source")]
    pub source: Option<Value>,
}

/// Stored product document.
#[derive(Debug, Deserialize)]
pub(super) struct ProductDocument {
    pub name: String,
    pub price: Price,
    pub flavour: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
}

impl ProductDocument {
    /// Attach the index identifier and drop blank optional fields.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id: ProductId::new(id),
            name: self.name,
            flavour: non_blank(self.flavour),
            product_type: non_blank(self.product_type),
            price: self.price,
            image_url: non_blank(self.image_url),
        }
    }
}

impl SearchResponse {
    /// Valid products in hit order; invalid documents are dropped.
    pub fn into_products(self) -> Vec<Product> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| decode_product(hit.id, hit.source))
            .collect()
    }
}

impl GetResponse {
    /// The product, or `None` when the document is missing or invalid.
    pub fn into_product(self) -> Option<Product> {
        if !self.found {
            return None;
        }
        self.source.and_then(|source| decode_product(self.id, source))
    }
}

fn decode_product(id: String, source: Value) -> Option<Product> {
    match serde_json::from_value::<ProductDocument>(source) {
        Ok(document) => Some(document.into_product(id)),
        Err(e) => {
            tracing::warn!(product_id = %id, error = %e, "Skipping invalid product document");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
