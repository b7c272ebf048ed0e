//! Integration test harness for Scoop.
//!
//! Drives the full storefront router in-process against a mock `OpenSearch`
//! cluster. Requests go through `tower::ServiceExt::oneshot`; the session
//! cookie is carried between requests so a test reads like one shopper
//! clicking through the site.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p scoop-integration-tests
//! ```
//!
//! No external services are needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scoop_storefront::config::{OpenSearchConfig, StorefrontConfig};
use scoop_storefront::routes;
use scoop_storefront::state::AppState;

/// Index name used by every test context.
pub const TEST_INDEX: &str = "products";

/// Hits requested per search in tests.
pub const TEST_RESULT_SIZE: usize = 10;

/// A rendered response, reduced to what the tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Location` header of a redirect
    pub location: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Whether this is a `303 See Other` to `target`.
    #[must_use]
    pub fn redirects_to(&self, target: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(target)
    }
}

/// One shopper's view of a storefront backed by a mock index.
pub struct TestContext {
    pub catalog: Arc<MockServer>,
    app: Router,
    cookie: Option<String>,
}

impl TestContext {
    /// Start a mock cluster and build the storefront against it.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    pub async fn new() -> Self {
        let catalog = Arc::new(MockServer::start().await);
        let app = routes::app(test_state(&catalog.uri()), MemoryStore::default());

        Self {
            catalog,
            app,
            cookie: None,
        }
    }

    /// Build a storefront whose catalog URL points at `url`.
    ///
    /// The mock cluster is still started but unused; handy for
    /// unreachable-index cases.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    pub async fn with_catalog_url(url: &str) -> Self {
        let catalog = Arc::new(MockServer::start().await);
        let app = routes::app(test_state(url), MemoryStore::default());

        Self {
            catalog,
            app,
            cookie: None,
        }
    }

    /// A second shopper on the same running storefront.
    ///
    /// Shares the router, session store and mock cluster, but starts without
    /// a session cookie.
    #[must_use]
    pub fn fork_session(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// `GET` a path.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request).await
    }

    /// `GET` a path with one extra request header.
    pub async fn get_with_header(&mut self, uri: &str, name: &str, value: &str) -> TestResponse {
        let request = self
            .request("GET", uri)
            .header(name, value)
            .body(Body::empty());
        self.send(request).await
    }

    /// `POST` a url-encoded form body to a path.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()));
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    #[allow(clippy::unwrap_used)]
    async fn send(&mut self, request: Result<Request<Body>, axum::http::Error>) -> TestResponse {
        let response = self.app.clone().oneshot(request.unwrap()).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            location,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Answer every search with the given `(id, source)` hits.
    pub async fn mount_search(&self, hits: &[(&str, Value)]) {
        Mock::given(method("POST"))
            .and(path(format!("/{TEST_INDEX}/_search")))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(hits)))
            .mount(&self.catalog)
            .await;
    }

    /// Answer document lookups for `id` with `source`.
    pub async fn mount_product(&self, id: &str, source: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{TEST_INDEX}/_doc/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_index": TEST_INDEX,
                "_id": id,
                "found": true,
                "_source": source,
            })))
            .mount(&self.catalog)
            .await;
    }

    /// Answer document lookups for `id` as missing.
    pub async fn mount_missing_product(&self, id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{TEST_INDEX}/_doc/{id}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "_index": TEST_INDEX,
                "_id": id,
                "found": false,
            })))
            .mount(&self.catalog)
            .await;
    }

    /// Answer the cluster root ping.
    pub async fn mount_ping(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "cluster_name": "test",
                "tagline": "The OpenSearch Project: https://opensearch.org/",
            })))
            .mount(&self.catalog)
            .await;
    }

    /// Search request bodies received by the mock cluster, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if request recording is disabled or a body is not JSON.
    #[allow(clippy::unwrap_used)]
    pub async fn search_bodies(&self) -> Vec<Value> {
        self.catalog
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path().ends_with("/_search"))
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// Stored product source as the index returns it.
#[must_use]
pub fn product_source(name: &str, price: f64, flavour: Option<&str>) -> Value {
    let mut source = json!({
        "name": name,
        "price": price,
        "product_type": "Ice Cream",
    });
    if let Some(flavour) = flavour {
        source["flavour"] = json!(flavour);
    }
    source
}

/// `_search` response body with the given hits.
#[must_use]
pub fn search_body(hits: &[(&str, Value)]) -> Value {
    let hits: Vec<Value> = hits
        .iter()
        .map(|(id, source)| {
            json!({
                "_index": TEST_INDEX,
                "_id": id,
                "_score": 1.0,
                "_source": source,
            })
        })
        .collect();

    json!({
        "took": 1,
        "timed_out": false,
        "hits": {
            "total": { "value": hits.len(), "relation": "eq" },
            "hits": hits,
        },
    })
}

#[allow(clippy::expect_used)]
fn test_state(catalog_url: &str) -> AppState {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        opensearch: OpenSearchConfig::new(catalog_url),
        search_result_size: TEST_RESULT_SIZE,
        sentry_dsn: None,
        sentry_environment: None,
    };

    AppState::new(config).expect("Failed to build test state")
}
