//! Outbound services used by the storefront routes.
//!
//! # Services
//!
//! - `checkout` - Client for the checkout session endpoint

pub mod checkout;

pub use checkout::{CheckoutClient, CheckoutError};
