//! Query DSL construction.
//!
//! The index consumes a JSON body of the shape
//!
//! ```json
//! {
//!   "size": 10,
//!   "query": {
//!     "bool": {
//!       "must": [
//!         { "multi_match": { "query": "vanilla", "fields": ["name", "flavour", "product_type"] } },
//!         { "range": { "price": { "gte": 5, "lte": 15 } } },
//!         { "match": { "flavour": "Vanilla" } },
//!         { "match": { "product_type": "Dessert" } }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! or `{ "match_all": {} }` when the filter sets nothing.

use rust_decimal::Decimal;
use serde::Serialize;

use super::SearchFilter;

/// Fields scored by the free-text condition.
pub const TEXT_FIELDS: [&str; 3] = ["name", "flavour", "product_type"];

/// Body of a `_search` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub size: usize,
    pub query: Query,
}

/// Top-level query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    MatchAll(MatchAll),
    Bool(BoolQuery),
}

/// Matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchAll {}

/// Conjunction of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    MultiMatch(MultiMatch),
    Range(RangeClause),
    Match(MatchField),
}

/// Free-text match scored across several fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiMatch {
    pub query: String,
    pub fields: [&'static str; 3],
}

/// Numeric range on the price field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeClause {
    pub price: PriceBounds,
}

/// Inclusive price bounds; an unset side is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBounds {
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gte: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub lte: Option<Decimal>,
}

/// Analyzed match on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Flavour(String),
    ProductType(String),
}

/// Build the search request for a filter.
///
/// Conditions appear in a fixed order: text, price range, flavour, product
/// type. A filter with no conditions yields `match_all`.
#[must_use]
pub fn build_query(filter: &SearchFilter, size: usize) -> SearchRequest {
    let mut must = Vec::new();

    if let Some(term) = &filter.term {
        must.push(Clause::MultiMatch(MultiMatch {
            query: term.clone(),
            fields: TEXT_FIELDS,
        }));
    }

    if filter.min_price.is_some() || filter.max_price.is_some() {
        must.push(Clause::Range(RangeClause {
            price: PriceBounds {
                gte: filter.min_price.map(|p| p.amount()),
                lte: filter.max_price.map(|p| p.amount()),
            },
        }));
    }

    if let Some(flavour) = &filter.flavour {
        must.push(Clause::Match(MatchField::Flavour(flavour.clone())));
    }

    if let Some(product_type) = &filter.product_type {
        must.push(Clause::Match(MatchField::ProductType(product_type.clone())));
    }

    let query = if must.is_empty() {
        Query::MatchAll(MatchAll {})
    } else {
        Query::Bool(BoolQuery { must })
    };

    SearchRequest { size, query }
}
