//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog listing / search results
//! POST /                       - Search form (redirects to GET /?search_term=...)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the catalog index)
//!
//! # Products
//! GET  /products/{id}          - Product detail
//!
//! # Basket
//! GET  /basket                 - Basket page with total
//! POST /basket/add             - Add item (redirects back to the listing)
//! POST /basket/remove          - Remove item (redirects to /basket)
//!
//! # Checkout
//! POST /checkout               - Mock checkout (renders confirmation)
//! ```

pub mod basket;
mod form;
pub mod health;
pub mod home;
pub mod products;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::MemoryStore;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

pub use products::ProductView;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the basket routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(basket::show))
        .route("/add", post(basket::add))
        .route("/remove", post(basket::remove))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog listing and search
        .route("/", get(home::index).post(home::search))
        // Product detail
        .route("/products/{id}", get(products::show))
        // Basket routes
        .nest("/basket", basket_routes())
        // Mock checkout
        .route("/checkout", post(basket::checkout))
}

/// Build the complete application: routes, static files, and middleware.
///
/// Sentry layers are added by the binary on top of this router.
pub fn app(state: AppState, session_store: MemoryStore) -> Router {
    let session_layer = create_session_layer(session_store, state.config());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
