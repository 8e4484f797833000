//! Session-held visitor state.
//!
//! The cart is stored as-is under [`keys::CART`]. A notice is written by one
//! request and removed by the next page view.

use double_take_core::Cart;
use tower_sessions::Session;

use super::Notice;

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the pending one-shot notice.
    pub const NOTICE: &str = "notice";
}

/// Load the visitor's cart, or an empty cart if none is stored.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the visitor's cart.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Queue a notice for the next page view.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn flash(session: &Session, notice: Notice) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::NOTICE, notice).await
}

/// Take the pending notice, if any.
///
/// # Errors
///
/// Returns error if the session store fails.
pub async fn take_notice(session: &Session) -> Result<Option<Notice>, tower_sessions::session::Error> {
    session.remove::<Notice>(keys::NOTICE).await
}
