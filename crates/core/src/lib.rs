//! Double Take Core - Shared domain library.
//!
//! This crate holds the storefront's domain logic:
//! - `storefront` - Public-facing shop, cart, checkout and admin form
//! - `integration-tests` - End-to-end tests against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no sessions. Handlers in the storefront load state,
//! apply an action, and store the result.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`cart`] - Cart line items and the cart reducer
//! - [`catalog`] - Product catalog with search and id assignment
//! - [`draft`] - Admin form draft and its validation
//! - [`checkout`] - Payload exchanged with the checkout endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod draft;
pub mod types;

pub use cart::{Cart, CartAction, CartLine};
pub use catalog::{Catalog, CatalogAction, NewProduct, Product};
pub use checkout::{CheckoutItem, CheckoutRequest, CheckoutSession};
pub use draft::{DraftError, ProductDraft};
pub use types::*;
