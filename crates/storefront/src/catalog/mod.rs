//! Catalog gateway over the `OpenSearch` product index.
//!
//! # Architecture
//!
//! - The index is the only source of product data; there is no local copy
//!   and no response cache
//! - Raw index documents are decoded into typed [`Product`] values here, once,
//!   so the rest of the storefront never handles untyped JSON
//! - "No such product" is a normal outcome (`Ok(None)`); anything that stops
//!   the index from answering is a [`CatalogError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use scoop_storefront::catalog::CatalogClient;
//! use scoop_storefront::search::SearchFilter;
//!
//! let client = CatalogClient::new(&config.opensearch, config.search_result_size)?;
//!
//! let results = client.search(&SearchFilter::with_term("vanilla")).await?;
//! let product = client.get_by_id(&ProductId::new("1")).await?;
//! ```

mod client;
mod documents;

pub use client::CatalogClient;

use scoop_core::Product;
use thiserror::Error;

/// Errors that can occur when talking to the catalog index.
///
/// All variants mean the index could not serve the request; none of them is
/// used for a product that simply does not exist.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Connection, TLS, or timeout failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The index answered with a non-success status.
    #[error("Index returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    /// The index matched nothing.
    NoResults,
    /// Matching products in index rank order. Built through
    /// `From<Vec<Product>>`, which maps an empty list to `NoResults`.
    Found(Vec<Product>),
}

impl SearchResults {
    /// The matched products, empty for `NoResults`.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            Self::NoResults => &[],
            Self::Found(products) => products,
        }
    }

    /// Whether there is nothing to list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products().is_empty()
    }
}

impl From<Vec<Product>> for SearchResults {
    fn from(products: Vec<Product>) -> Self {
        if products.is_empty() {
            Self::NoResults
        } else {
            Self::Found(products)
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scoop_core::Price;

    use super::*;

    #[test]
    fn test_empty_vec_is_no_results() {
        let results = SearchResults::from(Vec::new());
        assert_eq!(results, SearchResults::NoResults);
        assert!(results.is_empty());
        assert!(results.products().is_empty());
    }

    #[test]
    fn test_non_empty_vec_is_found() {
        let product = Product::new("1", "Product 1", Price::new(Decimal::new(1099, 2)).unwrap_or_default());
        let results = SearchResults::from(vec![product.clone()]);
        assert!(!results.is_empty());
        assert_eq!(results.products(), &[product]);
    }

    #[test]
    fn test_found_without_products_is_empty() {
        let results = SearchResults::Found(Vec::new());
        assert!(results.is_empty());
    }

    #[test]
    fn test_status_error_display() {
        let err = CatalogError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Index returned HTTP 503: unavailable");
    }
}
