//! Payload exchanged with the checkout session endpoint.
//!
//! The request carries product ids and quantities only. Prices are resolved
//! by whoever creates the payment session, never taken from the client.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::ProductId;

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub id: ProductId,
    pub qty: u32,
}

/// Body of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    /// Build a request from a cart, or `None` if the cart is empty.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }
        Some(Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CheckoutItem {
                    id: line.product_id.clone(),
                    qty: line.quantity,
                })
                .collect(),
        })
    }
}

/// Response of the checkout session endpoint.
///
/// `url` is optional on the wire; a missing url is a failed checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
