//! Stripe Checkout API client.
//!
//! # Architecture
//!
//! - Stripe is the system of record for payments; nothing is stored locally
//! - Sessions are created with inline `price_data`, priced from the catalog
//! - Webhook events are verified with the endpoint's signing secret and logged
//!
//! # Example
//!
//! ```rust,ignore
//! use double_take_storefront::stripe::{CheckoutLineItem, StripeClient};
//!
//! let client = StripeClient::new(&stripe_config, timeout)?;
//! let session = client
//!     .create_checkout_session(&[line], &success_url, &cancel_url)
//!     .await?;
//! ```

pub mod webhook;

use std::time::Duration;

use double_take_core::CheckoutSessionId;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::StripeConfig;

pub use webhook::{WebhookEvent, verify_signature};

/// Errors that can occur when interacting with Stripe.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or event payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Created session came back without a hosted checkout URL.
    #[error("Checkout session {0} has no url")]
    MissingUrl(CheckoutSessionId),

    /// Webhook signature header missing, malformed, stale, or wrong.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

/// One priced line for a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    /// Product name shown on the hosted page.
    pub name: String,
    /// Unit price in cents.
    pub unit_amount: i64,
    pub quantity: u32,
}

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub id: CheckoutSessionId,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: CheckoutSessionId,
    url: Option<String>,
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
    secret_key: SecretString,
    webhook_secret: SecretString,
    currency: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StripeConfig, timeout: Duration) -> Result<Self, StripeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            secret_key: config.secret_key.clone(),
            webhook_secret: config.webhook_secret.clone(),
            currency: config.currency.clone(),
        })
    }

    /// Create a hosted checkout session in payment mode.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, Stripe rejects it, or the
    /// response lacks a checkout URL.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create_checkout_session(
        &self,
        items: &[CheckoutLineItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CreatedSession, StripeError> {
        let url = format!("{}/checkout/sessions", self.api_base);
        let form = checkout_session_form(items, &self.currency, success_url, cancel_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))?;

        debug!(session_id = %session.id, "Checkout session created");

        match session.url {
            Some(url) => Ok(CreatedSession {
                id: session.id,
                url,
            }),
            None => Err(StripeError::MissingUrl(session.id)),
        }
    }

    /// Verify a webhook delivery and parse its event.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::InvalidSignature`] if verification fails and
    /// [`StripeError::Parse`] if the verified body is not an event.
    pub fn construct_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, StripeError> {
        let now = chrono::Utc::now().timestamp();
        verify_signature(
            payload,
            signature_header,
            self.webhook_secret.expose_secret(),
            now,
        )?;
        serde_json::from_slice(payload).map_err(|e| StripeError::Parse(e.to_string()))
    }
}

/// Encode a checkout session request in Stripe's bracketed form syntax.
fn checkout_session_form(
    items: &[CheckoutLineItem],
    currency: &str,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
    ];

    for (i, item) in items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((
            format!("{prefix}[price_data][currency]"),
            currency.to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    form
}
