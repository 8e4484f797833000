//! Checkout route handler.
//!
//! Hands the session cart to the checkout gateway and sends the visitor to
//! the hosted payment page. Failures become a notice and the cart is kept.

use axum::{extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::models::Notice;
use crate::models::session::{flash, load_cart};
use crate::services::CheckoutError;
use crate::state::AppState;

/// Start a hosted checkout for the visitor's cart.
#[instrument(skip(state, session))]
pub async fn start(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let cart = load_cart(&session).await?;

    let notice = match state.checkout().start_checkout(&cart).await {
        Ok(url) => {
            add_breadcrumb("checkout", "Redirected to hosted checkout", None);
            tracing::info!(items = cart.item_count(), "Checkout started");
            return Ok(Redirect::to(url.as_str()));
        }
        Err(CheckoutError::EmptyCart) => Notice::EmptyCart,
        Err(CheckoutError::MissingRedirectUrl) => {
            tracing::warn!("Checkout endpoint did not return a url");
            Notice::MissingRedirectUrl
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to start checkout");
            Notice::CheckoutFailed
        }
    };

    flash(&session, notice).await?;
    Ok(Redirect::to("/"))
}
