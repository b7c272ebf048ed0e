//! Basket and checkout route handlers.
//!
//! The basket lives in the session. Every handler loads it, applies one
//! operation, and writes it back before responding. Catalog lookups happen
//! before the basket is touched, so a failing index never leaves a
//! half-applied change behind.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use scoop_core::{CheckoutError, ProductId, Receipt};

use super::ProductView;
use super::form::first_value;
use super::home::query_suffix;
use crate::error::{Result, add_breadcrumb};
use crate::models::Notice;
use crate::models::session::{load_basket, save_basket, set_notice, take_notice};
use crate::state::AppState;

/// Flashed after a product is added.
pub const ADDED_MESSAGE: &str = "Item was successfully added to the basket.";

/// Flashed when the product to add does not exist.
pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product not found.";

/// Flashed when checkout is attempted with nothing in the basket.
pub const EMPTY_CHECKOUT_MESSAGE: &str = "You cannot check out, the basket is empty.";

/// Add/remove form data.
///
/// The identifier is optional so a malformed request is a no-op rather than
/// a rejection.
#[derive(Debug)]
pub struct BasketItemForm {
    pub product_id: Option<String>,
}

impl BasketItemForm {
    /// Read the form from a url-encoded body, keeping the first `product_id`.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        Self {
            product_id: first_value(body, "product_id"),
        }
    }

    fn product_id(&self) -> Option<ProductId> {
        self.product_id.as_deref().and_then(ProductId::parse)
    }
}

/// Basket page template.
#[derive(Template, WebTemplate)]
#[template(path = "basket/show.html")]
pub struct BasketShowTemplate {
    pub items: Vec<ProductView>,
    pub total: String,
    pub notice: Option<Notice>,
}

/// Checkout confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "basket/checkout.html")]
pub struct CheckoutTemplate {
    pub items: Vec<ProductView>,
    pub total: String,
    pub notice: Option<Notice>,
}

impl From<&Receipt> for CheckoutTemplate {
    fn from(receipt: &Receipt) -> Self {
        Self {
            items: receipt.items.iter().map(ProductView::from).collect(),
            total: receipt.total.to_string(),
            notice: None,
        }
    }
}

/// Display the basket with its running total.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<BasketShowTemplate> {
    let basket = load_basket(&session).await?;

    Ok(BasketShowTemplate {
        items: basket.iter().map(ProductView::from).collect(),
        total: basket.total().to_string(),
        notice: take_notice(&session).await,
    })
}

/// Add a product to the basket.
///
/// The product is looked up in the catalog and a full snapshot appended.
/// Redirects back to the listing, keeping the current search parameters.
#[instrument(skip(state, session, body))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RawQuery(raw_query): RawQuery,
    body: Bytes,
) -> Result<Redirect> {
    let form = BasketItemForm::from_body(&body);
    let back = format!("/{}", query_suffix(raw_query.as_deref()));

    let Some(id) = form.product_id() else {
        tracing::debug!("Ignoring add without a product id");
        return Ok(Redirect::to(&back));
    };

    let notice = match state.catalog().get_by_id(&id).await? {
        Some(product) => {
            let mut basket = load_basket(&session).await?;
            basket.add(product);
            save_basket(&session, &basket).await?;

            add_breadcrumb("basket", "Added item", Some(&[("product_id", id.as_str())]));
            tracing::info!(product_id = %id, items = basket.len(), "Added item to basket");
            Notice::success(ADDED_MESSAGE)
        }
        None => {
            tracing::info!(product_id = %id, "Product not found, basket unchanged");
            Notice::info(PRODUCT_NOT_FOUND_MESSAGE)
        }
    };

    set_notice(&session, notice).await?;
    Ok(Redirect::to(&back))
}

/// Remove the first basket item with the given identifier.
///
/// Unknown or missing identifiers leave the basket unchanged.
#[instrument(skip(session, body))]
pub async fn remove(session: Session, body: Bytes) -> Result<Redirect> {
    let form = BasketItemForm::from_body(&body);
    if let Some(id) = form.product_id() {
        let mut basket = load_basket(&session).await?;
        if basket.remove(&id).is_some() {
            save_basket(&session, &basket).await?;
            tracing::info!(product_id = %id, items = basket.len(), "Removed item from basket");
        }
    }

    Ok(Redirect::to("/basket"))
}

/// Mock checkout.
///
/// An empty basket is rejected with a notice. Otherwise the receipt is taken
/// and the emptied basket stored before the confirmation is rendered; if the
/// store fails the request fails and nothing is reported as paid.
#[instrument(skip(session))]
pub async fn checkout(session: Session) -> Result<Response> {
    let mut basket = load_basket(&session).await?;

    match basket.checkout() {
        Err(CheckoutError::EmptyBasket) => {
            tracing::info!("Checkout rejected, basket is empty");
            set_notice(&session, Notice::info(EMPTY_CHECKOUT_MESSAGE)).await?;
            Ok(Redirect::to("/basket").into_response())
        }
        Ok(receipt) => {
            save_basket(&session, &basket).await?;

            add_breadcrumb("checkout", "Completed checkout", None);
            tracing::info!(
                items = receipt.items.len(),
                total = %receipt.total,
                "Checkout complete"
            );
            Ok(CheckoutTemplate::from(&receipt).into_response())
        }
    }
}
