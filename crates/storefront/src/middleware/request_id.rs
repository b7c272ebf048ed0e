//! Request correlation IDs.
//!
//! Each request carries an ID that ties together its log lines, any Sentry
//! event it raises, and the response the shopper receives. An ID supplied by
//! a proxy in `x-request-id` is reused when it looks sane; anything else is
//! replaced with a fresh UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted verbatim.
const MAX_UPSTREAM_LEN: usize = 128;

/// Correlation ID of the current request, available as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Reuse an upstream ID if acceptable, otherwise generate one.
    #[must_use]
    pub fn from_upstream(upstream: Option<&str>) -> Self {
        upstream
            .filter(|id| is_acceptable(id))
            .map_or_else(|| Self(Uuid::new_v4().to_string()), |id| Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Printable ASCII, no spaces, bounded length. Keeps log lines intact.
fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_UPSTREAM_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Attach a [`RequestId`] to the request, its span, the Sentry scope, and
/// the response headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_upstream(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id.as_str());
    });

    request.extensions_mut().insert(request_id.clone());
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
