//! Search filter normalisation.
//!
//! Every field distinguishes "absent" from "present" explicitly:
//!
//! - text fields (`search_term`, `flavour`, `product_type`) are trimmed and an
//!   empty result counts as absent, so `?search_term=` and no parameter at all
//!   build the same filter;
//! - price bounds are present whenever they parse as a non-negative decimal,
//!   including `0`. Anything else is dropped and logged, for both bounds alike.
//!
//! `min_price > max_price` is kept as-is; the index simply matches nothing.
//!
//! The query string itself is read leniently: a repeated key keeps its first
//! value, unknown keys are ignored, and bad percent-encoding is decoded
//! lossily. No query string is ever rejected.

use rust_decimal::Decimal;
use url::form_urlencoded;

use scoop_core::Price;

/// Raw search parameters as they arrive in the query string.
#[derive(Debug, Default, Clone)]
pub struct SearchParams {
    pub search_term: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub flavour: Option<String>,
    pub product_type: Option<String>,
}

/// Normalised search filter for one request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    /// Free-text term matched against name, flavour, and product type
    pub term: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<Price>,
    /// Inclusive upper price bound
    pub max_price: Option<Price>,
    /// Flavour to match
    pub flavour: Option<String>,
    /// Product type (category) to match
    pub product_type: Option<String>,
}

impl SearchParams {
    /// Read the known parameters from a raw query string.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "search_term" => &mut params.search_term,
                "min_price" => &mut params.min_price,
                "max_price" => &mut params.max_price,
                "flavour" => &mut params.flavour,
                "product_type" => &mut params.product_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }
}

impl SearchFilter {
    /// Normalise raw request parameters.
    #[must_use]
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            term: non_blank(params.search_term.as_deref()),
            min_price: parse_price_bound("min_price", params.min_price.as_deref()),
            max_price: parse_price_bound("max_price", params.max_price.as_deref()),
            flavour: non_blank(params.flavour.as_deref()),
            product_type: non_blank(params.product_type.as_deref()),
        }
    }

    /// A filter with only a free-text term.
    #[must_use]
    pub fn with_term(term: &str) -> Self {
        Self {
            term: non_blank(Some(term)),
            ..Self::default()
        }
    }

    /// Whether no condition at all is set.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.term.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.flavour.is_none()
            && self.product_type.is_none()
    }
}

/// Trim a text parameter, treating empty input as absent.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Parse a price bound, dropping malformed values.
fn parse_price_bound(field: &'static str, value: Option<&str>) -> Option<Price> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;

    let parsed = raw
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .and_then(|amount| Price::new(amount).ok());

    if parsed.is_none() {
        tracing::debug!(field, value = raw, "Ignoring malformed price bound");
    }

    parsed
}
