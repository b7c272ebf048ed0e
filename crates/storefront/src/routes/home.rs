//! Catalog listing and search handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use super::ProductView;
use super::form::first_value;
use crate::error::Result;
use crate::models::Notice;
use crate::models::session::take_notice;
use crate::search::{SearchFilter, SearchParams};
use crate::state::AppState;

/// Message shown when the index matches nothing.
pub const NO_RESULTS_MESSAGE: &str = "No search results.";

/// Current filter values echoed back into the filter form.
#[derive(Clone, Default)]
pub struct FilterFormView {
    pub search_term: String,
    pub min_price: String,
    pub max_price: String,
    pub flavour: String,
    pub product_type: String,
}

impl From<&SearchParams> for FilterFormView {
    fn from(params: &SearchParams) -> Self {
        let echo = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            search_term: echo(&params.search_term),
            min_price: echo(&params.min_price),
            max_price: echo(&params.max_price),
            flavour: echo(&params.flavour),
            product_type: echo(&params.product_type),
        }
    }
}

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct IndexTemplate {
    pub page_title: &'static str,
    pub form: FilterFormView,
    pub products: Vec<ProductView>,
    pub no_results_message: Option<&'static str>,
    /// Current query string (with leading `?`) so add-to-basket returns here
    pub return_query: String,
    pub notice: Option<Notice>,
}

/// Display the catalog, filtered by whatever parameters were supplied.
///
/// With no usable parameters every product is listed under "All Products".
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RawQuery(raw_query): RawQuery,
) -> Result<IndexTemplate> {
    let params = SearchParams::from_query(raw_query.as_deref().unwrap_or_default());
    let filter = SearchFilter::from_params(&params);
    let results = state.catalog().search(&filter).await?;

    let page_title = if filter.is_unfiltered() {
        "All Products"
    } else {
        "Search Results"
    };

    Ok(IndexTemplate {
        page_title,
        form: FilterFormView::from(&params),
        products: results.products().iter().map(ProductView::from).collect(),
        no_results_message: results.is_empty().then_some(NO_RESULTS_MESSAGE),
        return_query: query_suffix(raw_query.as_deref()),
        notice: take_notice(&session).await,
    })
}

/// Handle the header search form.
///
/// A blank or missing term goes back to the unfiltered listing.
#[instrument(skip(body))]
pub async fn search(body: Bytes) -> Redirect {
    match first_value(&body, "search_term").as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            Redirect::to(&format!("/?search_term={}", urlencoding::encode(term)))
        }
        _ => Redirect::to("/"),
    }
}

/// `?query` for a non-empty raw query string, otherwise empty.
pub(crate) fn query_suffix(raw_query: Option<&str>) -> String {
    raw_query
        .filter(|q| !q.is_empty())
        .map(|q| format!("?{q}"))
        .unwrap_or_default()
}
