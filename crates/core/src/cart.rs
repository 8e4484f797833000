//! Shopping cart and its reducer.
//!
//! A cart is an ordered list of line items, one per product, kept in the
//! order products were first added. Lines copy the product's title and price
//! at add time, so later catalog changes never reprice an existing line.
//!
//! Every change goes through [`CartAction`]; [`reduce`] is the pure form and
//! [`Cart::apply`] the in-place form used by request handlers.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    /// Title at add time.
    pub title: String,
    /// Unit price at add time.
    pub price: Price,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Actions that change a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product, merging with an existing line.
    Add(Product),
    /// Drop the line for a product. No-op if absent.
    Remove(ProductId),
    /// Set a line's quantity. Zero or below removes the line; no-op if absent.
    SetQuantity(ProductId, i64),
    /// Empty the cart.
    Clear,
}

/// A visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines (badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add one unit of `product`.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            quantity: 1,
        });
    }

    /// Remove the line for `product_id` if present.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| &l.product_id != product_id);
    }

    /// Set the quantity for `product_id`. Values of zero or below remove the
    /// line; values above `u32::MAX` saturate.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Apply an action in place.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(product) => self.add(&product),
            CartAction::Remove(id) => self.remove(&id),
            CartAction::SetQuantity(id, quantity) => self.set_quantity(&id, quantity),
            CartAction::Clear => self.clear(),
        }
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product_id == product_id)
    }
}

/// Pure reducer: `(cart, action) -> cart'`.
#[must_use]
pub fn reduce(mut cart: Cart, action: CartAction) -> Cart {
    cart.apply(action);
    cart
}
