use serde::{Deserialize, Serialize};

/// One-shot message shown at the top of the next page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Visitor returned from a completed hosted checkout.
    OrderPlaced,
    /// Visitor backed out of the hosted checkout.
    CheckoutCanceled,
    /// Checkout was requested with nothing in the cart.
    EmptyCart,
    /// Gateway answered without a URL to redirect to.
    MissingRedirectUrl,
    /// Gateway could not be reached or rejected the cart.
    CheckoutFailed,
    /// An admin submission was added to the catalog.
    ProductAdded,
}

impl Notice {
    /// Text shown to the visitor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OrderPlaced => "Order placed! You will receive an email confirmation.",
            Self::CheckoutCanceled => {
                "Order canceled -- continue to shop around and checkout when you're ready."
            }
            Self::EmptyCart => "Your cart is empty.",
            Self::MissingRedirectUrl => {
                "Checkout endpoint did not return a url. Check server logs."
            }
            Self::CheckoutFailed => "Failed to start checkout.",
            Self::ProductAdded => "Product added to the catalog.",
        }
    }

    /// Whether the notice reports a problem.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::EmptyCart | Self::MissingRedirectUrl | Self::CheckoutFailed
        )
    }
}
