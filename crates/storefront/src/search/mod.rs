//! Catalog search filters and query construction.
//!
//! Request parameters are normalised into a [`SearchFilter`] once, then
//! translated into the index's boolean query DSL by [`build_query`]. Neither
//! step can fail: malformed parameters are dropped during normalisation and
//! an empty filter becomes a match-all query.

mod filter;
mod query;

pub use filter::{SearchFilter, SearchParams};
pub use query::{
    BoolQuery, Clause, MatchAll, MatchField, MultiMatch, PriceBounds, Query, RangeClause,
    SearchRequest, TEXT_FIELDS, build_query,
};
