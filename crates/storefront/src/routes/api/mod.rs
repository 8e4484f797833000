//! JSON API routes backed by Stripe.
//!
//! - `POST /api/create-checkout-session` - price a cart and open a hosted checkout
//! - `POST /api/webhook` - receive signed Stripe events

pub mod checkout_session;
pub mod webhook;

use crate::error::AppError;
use crate::state::AppState;
use crate::stripe::StripeClient;

/// Get the Stripe client or answer `503 Service Unavailable`.
fn require_stripe(state: &AppState) -> Result<&StripeClient, AppError> {
    state
        .stripe()
        .ok_or_else(|| AppError::Unavailable("Stripe is not configured".to_string()))
}
