//! Checkout gateway client.
//!
//! Posts the cart's ids and quantities to the checkout session endpoint and
//! returns the hosted payment page to redirect to. The endpoint is usually
//! this service's own `/api/create-checkout-session`, but any gateway that
//! speaks the same JSON works.

use double_take_core::{Cart, CheckoutRequest, CheckoutSession};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::CheckoutConfig;

/// Errors that can occur when starting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out; no request was sent.
    #[error("Cart is empty")]
    EmptyCart,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("Gateway error: {status} - {message}")]
    Gateway { status: u16, message: String },

    /// Gateway responded without a redirect URL.
    #[error("Checkout response had no url")]
    MissingRedirectUrl,

    /// Gateway returned a URL that could not be parsed.
    #[error("Invalid checkout url: {0}")]
    InvalidRedirectUrl(#[from] url::ParseError),
}

/// Client for the checkout session endpoint.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CheckoutClient {
    /// Create a new checkout client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// The endpoint checkout requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request a checkout session for `cart` and return its redirect URL.
    ///
    /// Relative URLs are resolved against the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without contacting the gateway
    /// when the cart is empty, and the other variants when the request
    /// fails or the response has no usable URL.
    #[instrument(skip(self, cart), fields(lines = cart.line_count()))]
    pub async fn start_checkout(&self, cart: &Cart) -> Result<Url, CheckoutError> {
        let request = CheckoutRequest::from_cart(cart).ok_or(CheckoutError::EmptyCart)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Checkout gateway rejected request");
            return Err(CheckoutError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response.json().await?;
        let url = session.url.ok_or(CheckoutError::MissingRedirectUrl)?;
        let redirect = self.endpoint.join(&url)?;

        debug!(redirect = %redirect, "Checkout session ready");

        Ok(redirect)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client() -> CheckoutClient {
        let config = CheckoutConfig {
            // Nothing listens here; an empty cart must never reach it.
            endpoint: Url::parse("http://127.0.0.1:9/api/create-checkout-session").unwrap(),
            timeout: Duration::from_millis(200),
        };
        CheckoutClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_empty_cart_short_circuits() {
        let result = client().start_checkout(&Cart::new()).await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_endpoint_is_kept() {
        assert_eq!(client().endpoint().path(), "/api/create-checkout-session");
    }
}
