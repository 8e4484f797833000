//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation loads it, applies
//! one [`CartAction`], stores it back, and redirects to the home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use double_take_core::{Cart, CartAction, CartLine, ProductId, cart::reduce};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
    pub line_count: usize,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            title: line.title.clone(),
            quantity: line.quantity,
            price: line.price.to_string(),
            line_total: line.line_total().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: cart.subtotal().to_string(),
            item_count: cart.item_count(),
            line_count: cart.line_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update quantity form data.
///
/// The quantity arrives as raw text; see [`UpdateCartForm::quantity`].
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: String,
}

impl UpdateCartForm {
    /// Requested quantity. Blank or non-numeric input counts as 1.
    #[must_use]
    pub fn quantity(&self) -> i64 {
        self.quantity.trim().parse().unwrap_or(1)
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Load the cart, apply one action, and store it back.
async fn update_cart(session: &Session, action: CartAction) -> Result<Cart> {
    let cart = reduce(load_cart(session).await?, action);
    save_cart(session, &cart).await?;
    Ok(cart)
}

/// Add one unit of a catalog product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state
        .catalog()
        .read()
        .await
        .get(&form.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Product {}", form.product_id)))?;

    let cart = update_cart(&session, CartAction::Add(product)).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );
    tracing::debug!(items = cart.item_count(), "Cart updated");

    Ok(Redirect::to("/"))
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let quantity = form.quantity();
    update_cart(&session, CartAction::SetQuantity(form.product_id, quantity)).await?;
    Ok(Redirect::to("/"))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    update_cart(&session, CartAction::Remove(form.product_id)).await?;
    Ok(Redirect::to("/"))
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use double_take_core::Catalog;

    use super::*;

    #[test]
    fn test_cart_view_formats_prices() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        for id in ["p1", "p1", "p3"] {
            cart.add(catalog.get(&ProductId::new(id)).unwrap());
        }

        let view = CartView::from(&cart);

        assert_eq!(view.subtotal, "$124.00");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.line_count, 2);
        assert_eq!(view.lines[0].title, "90s Floral Midi Dress");
        assert_eq!(view.lines[0].price, "$48.00");
        assert_eq!(view.lines[0].line_total, "$96.00");
    }

    #[test]
    fn test_update_form_coerces_bad_quantity_to_one() {
        let form = |quantity: &str| UpdateCartForm {
            product_id: ProductId::new("p1"),
            quantity: quantity.to_string(),
        };

        assert_eq!(form("").quantity(), 1);
        assert_eq!(form("abc").quantity(), 1);
        assert_eq!(form(" 4 ").quantity(), 4);
        assert_eq!(form("0").quantity(), 0);
        assert_eq!(form("-2").quantity(), -2);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::empty();
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "$0.00");
    }
}
