//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Shop: catalog grid, search, cart panel, policy
//!
//! # Cart (form posts, 303 back to /)
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set a line's quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Redirect to hosted checkout, or back with a notice
//!
//! # Admin
//! GET  /admin                  - Add-product form
//! POST /admin/products         - Submit the form
//!
//! # Stripe API
//! POST /api/create-checkout-session - Create a Stripe Checkout Session
//! POST /api/webhook                 - Stripe webhook receiver
//! ```

pub mod admin;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::show))
        .route("/products", post(admin::create))
}

/// Create the Stripe API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(api::checkout_session::create),
        )
        .route("/webhook", post(api::webhook::receive))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::start))
        .nest("/admin", admin_routes())
        .nest("/api", api_routes())
}
