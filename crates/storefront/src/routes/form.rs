//! Lenient reading of url-encoded form bodies.
//!
//! Handlers pick the one field they need out of the raw body. Repeated keys
//! keep their first value and a body that is not url-encoded simply has no
//! fields, so a malformed post falls through to the handler's no-op path.

use url::form_urlencoded;

/// First value of `key` in a url-encoded body.
pub(crate) fn first_value(body: &[u8], key: &str) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.into_owned())
}
