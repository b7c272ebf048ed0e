//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use scoop_core::{Product, ProductId};

use crate::error::Result;
use crate::models::Notice;
use crate::models::session::take_notice;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    /// URL of the product detail page
    pub path: String,
    pub name: String,
    pub flavour: Option<String>,
    pub product_type: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            path: format!("/products/{}", urlencoding::encode(product.id.as_str())),
            name: product.name.clone(),
            flavour: product.flavour.clone(),
            product_type: product.product_type.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub notice: Option<Notice>,
}

/// Product not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub notice: Option<Notice>,
}

/// Render the "product unavailable" page.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { notice: None }).into_response()
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(id) = ProductId::parse(&id) else {
        return Ok(not_found());
    };

    let Some(product) = state.catalog().get_by_id(&id).await? else {
        return Ok(not_found());
    };

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        notice: take_notice(&session).await,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use scoop_core::Price;

    use super::*;

    #[test]
    fn test_product_view_formats_price_and_path() {
        let product = Product::new("abc/1", "Product 1", Price::new(Decimal::new(1099, 2)).unwrap())
            .with_flavour("Vanilla");

        let view = ProductView::from(&product);

        assert_eq!(view.id, "abc/1");
        assert_eq!(view.path, "/products/abc%2F1");
        assert_eq!(view.price, "£10.99");
        assert_eq!(view.flavour.as_deref(), Some("Vanilla"));
    }
}
