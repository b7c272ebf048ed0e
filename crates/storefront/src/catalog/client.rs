//! `OpenSearch` REST client implementation.
//!
//! Uses `reqwest` for HTTP with optional basic auth. Every call is a single
//! request: no caching, no retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use scoop_core::{Product, ProductId};

use super::documents::{GetResponse, SearchResponse};
use super::{CatalogError, SearchResults};
use crate::config::OpenSearchConfig;
use crate::search::{SearchFilter, build_query};

/// Maximum number of body characters kept in error messages and logs.
const ERROR_BODY_LIMIT: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product index.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<SecretString>,
    result_size: usize,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialise).
    pub fn new(config: &OpenSearchConfig, result_size: usize) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.url.clone(),
                index: config.index.clone(),
                username: config.username.clone(),
                password: config.password.clone(),
                result_size,
            }),
        })
    }

    /// Start a request against a path relative to the cluster base URL.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);

        match &self.inner.username {
            Some(username) => builder.basic_auth(
                username,
                self.inner.password.as_ref().map(|p| p.expose_secret()),
            ),
            None => builder,
        }
    }

    /// Read the body of a successful response, or turn the status into an error.
    async fn success_body(response: Response) -> Result<String, CatalogError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "Catalog index returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(body)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Search the catalog.
    ///
    /// Returns `SearchResults::NoResults` when the index matches nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is unreachable, answers with a failure
    /// status, or returns a body that is not a search response. Individual
    /// documents that are not valid products are skipped, not reported.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: &SearchFilter) -> Result<SearchResults, CatalogError> {
        let body = build_query(filter, self.inner.result_size);

        let response = self
            .request(Method::POST, &format!("{}/_search", self.inner.index))
            .json(&body)
            .send()
            .await?;

        let text = Self::success_body(response).await?;
        let parsed: SearchResponse = serde_json::from_str(&text).inspect_err(|e| {
            tracing::error!(error = %e, body = %truncate(&text), "Failed to parse search response");
        })?;

        let products = parsed.into_products();
        debug!(hits = products.len(), "Catalog search complete");

        Ok(SearchResults::from(products))
    }

    /// Look up a single product by identifier.
    ///
    /// Returns `Ok(None)` when the index has no such document.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is unreachable, answers with a failure
    /// status (other than a document-level 404), or returns an undecodable
    /// body.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let path = format!(
            "{}/_doc/{}",
            self.inner.index,
            urlencoding::encode(id.as_str())
        );

        let response = self.request(Method::GET, &path).send().await?;

        // A missing document is a 404 with `found: false`. A missing index is
        // also a 404, but with an error body, and must not read as "not found".
        if response.status() == StatusCode::NOT_FOUND {
            let body = response.text().await?;
            return match serde_json::from_str::<GetResponse>(&body) {
                Ok(parsed) if !parsed.found => {
                    debug!("Product not found");
                    Ok(None)
                }
                _ => Err(CatalogError::Status {
                    status: StatusCode::NOT_FOUND.as_u16(),
                    body: truncate(&body),
                }),
            };
        }

        let text = Self::success_body(response).await?;
        let parsed: GetResponse = serde_json::from_str(&text).inspect_err(|e| {
            tracing::error!(error = %e, body = %truncate(&text), "Failed to parse document response");
        })?;

        Ok(parsed.into_product())
    }

    /// Check that the cluster answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), CatalogError> {
        let response = self.request(Method::GET, "").send().await?;
        Self::success_body(response).await.map(|_| ())
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(&OpenSearchConfig::new(server.uri()), 10).unwrap()
    }

    fn hit(id: &str, name: &str, flavour: &str, price: f64) -> serde_json::Value {
        json!({
            "_index": "products",
            "_id": id,
            "_score": 1.0,
            "_source": { "name": name, "flavour": flavour, "price": price }
        })
    }

    #[tokio::test]
    async fn test_search_sends_built_query_and_copies_ids() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products/_search"))
            .and(body_json(json!({
                "size": 10,
                "query": {
                    "bool": {
                        "must": [
                            { "multi_match": { "query": "vanilla", "fields": ["name", "flavour", "product_type"] } }
                        ]
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": { "hits": [
                    hit("1", "Product 1", "Vanilla", 10.99),
                    hit("2", "Product 2", "Chocolate", 9.99)
                ] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server)
            .search(&SearchFilter::with_term("vanilla"))
            .await
            .unwrap();

        let products = results.products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id.as_str(), "1");
        assert_eq!(products[0].name, "Product 1");
        assert_eq!(products[1].flavour.as_deref(), Some("Chocolate"));
        assert_eq!(products[1].price.amount(), Decimal::new(999, 2));
    }

    #[tokio::test]
    async fn test_search_with_no_hits_is_no_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products/_search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "hits": { "hits": [] } })),
            )
            .mount(&server)
            .await;

        let results = client_for(&server)
            .search(&SearchFilter::default())
            .await
            .unwrap();

        assert_eq!(results, SearchResults::NoResults);
    }

    #[tokio::test]
    async fn test_search_skips_invalid_documents() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": { "hits": [
                    hit("1", "Good", "Vanilla", 4.5),
                    { "_id": "2", "_source": { "name": "Bad", "price": -1 } }
                ] }
            })))
            .mount(&server)
            .await;

        let results = client_for(&server)
            .search(&SearchFilter::default())
            .await
            .unwrap();

        assert_eq!(results.products().len(), 1);
        assert_eq!(results.products()[0].name, "Good");
    }

    #[tokio::test]
    async fn test_search_with_only_invalid_documents_is_no_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": { "hits": [ { "_id": "2", "_source": { "price": 3 } } ] }
            })))
            .mount(&server)
            .await;

        let results = client_for(&server)
            .search(&SearchFilter::default())
            .await
            .unwrap();

        assert_eq!(results, SearchResults::NoResults);
    }

    #[tokio::test]
    async fn test_search_server_error_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products/_search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&SearchFilter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_search_malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/products/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search(&SearchFilter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/_doc/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_index": "products",
                "_id": "1",
                "found": true,
                "_source": {
                    "name": "Product 1",
                    "flavour": "Vanilla",
                    "price": 10.99,
                    "image_url": "https://example.com/product1.jpg"
                }
            })))
            .mount(&server)
            .await;

        let product = client_for(&server)
            .get_by_id(&ProductId::new("1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.name, "Product 1");
        assert_eq!(product.flavour.as_deref(), Some("Vanilla"));
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://example.com/product1.jpg")
        );
    }

    #[tokio::test]
    async fn test_get_by_id_missing_document_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/_doc/invalid_id"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "_index": "products",
                "_id": "invalid_id",
                "found": false
            })))
            .mount(&server)
            .await;

        let product = client_for(&server)
            .get_by_id(&ProductId::new("invalid_id"))
            .await
            .unwrap();

        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_index_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products/_doc/1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "type": "index_not_found_exception", "reason": "no such index [products]" },
                "status": 404
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_by_id(&ProductId::new("1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_unreachable_index_is_transport_error() {
        // Nothing listens on the reserved port 9 (discard) on localhost in test environments
        let client = CatalogClient::new(&OpenSearchConfig::new("http://127.0.0.1:9"), 10).unwrap();

        let err = client.get_by_id(&ProductId::new("1")).await.unwrap_err();

        assert!(matches!(err, CatalogError::Transport(_)));
    }

    #[tokio::test]
    async fn test_basic_auth_header_is_sent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cluster_name": "test" })))
            .expect(1)
            .mount(&server)
            .await;

        let config = OpenSearchConfig {
            username: Some("admin".to_string()),
            password: Some(SecretString::from("admin")),
            ..OpenSearchConfig::new(server.uri())
        };
        let client = CatalogClient::new(&config, 10).unwrap();

        assert!(client.ping().await.is_ok());
    }
}
