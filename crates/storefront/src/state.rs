//! Application state shared across handlers.

use std::sync::Arc;

use double_take_core::Catalog;
use tokio::sync::RwLock;

use crate::config::StorefrontConfig;
use crate::services::{CheckoutClient, CheckoutError};
use crate::stripe::{StripeClient, StripeError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("checkout client: {0}")]
    Checkout(#[from] CheckoutError),
    #[error("stripe client: {0}")]
    Stripe(#[from] StripeError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is the only
/// mutable piece and is shared by every visitor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: RwLock<Catalog>,
    checkout: CheckoutClient,
    stripe: Option<StripeClient>,
}

impl AppState {
    /// Create application state with the seeded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        Self::with_catalog(config, Catalog::seeded())
    }

    /// Create application state around an existing catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StateError> {
        let checkout = CheckoutClient::new(&config.checkout)?;
        let stripe = config
            .stripe
            .as_ref()
            .map(|stripe| StripeClient::new(stripe, config.checkout.timeout))
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: RwLock::new(catalog),
                checkout,
                stripe,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the shared product catalog.
    #[must_use]
    pub fn catalog(&self) -> &RwLock<Catalog> {
        &self.inner.catalog
    }

    /// Get the checkout gateway client.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }

    /// Get the Stripe client, if Stripe is configured.
    #[must_use]
    pub fn stripe(&self) -> Option<&StripeClient> {
        self.inner.stripe.as_ref()
    }
}
