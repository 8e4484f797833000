//! Response security headers.
//!
//! The policy is built once from configuration. Pages only load their own
//! script and stylesheet; product images may come from any HTTPS host since
//! the admin form takes arbitrary image URLs. The checkout form ends in a
//! redirect to the hosted payment page, so its origin must be listed in
//! `form-action`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

use crate::config::StorefrontConfig;

/// Origin of Stripe's hosted checkout page.
pub const STRIPE_CHECKOUT_ORIGIN: &str = "https://checkout.stripe.com";

/// Used when the configured origins cannot be put in a header.
const FALLBACK_CSP: &str = "default-src 'none'; script-src 'self'; style-src 'self'; \
     img-src 'self' https: data:; base-uri 'self'; form-action 'self'; frame-ancestors 'none'";

/// Headers added to every response.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl SecurityHeaders {
    /// Build the header set for this deployment.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let targets = checkout_origins(config);
        let csp = content_security_policy(&targets);
        let csp = HeaderValue::from_str(&csp).unwrap_or_else(|_| {
            tracing::warn!(%csp, "Checkout origin not valid in a header, using fallback CSP");
            HeaderValue::from_static(FALLBACK_CSP)
        });

        let headers = vec![
            (CONTENT_SECURITY_POLICY, csp),
            (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
            (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
            (
                REFERRER_POLICY,
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ),
            (
                HeaderName::from_static("permissions-policy"),
                HeaderValue::from_static("camera=(), microphone=(), geolocation=(), payment=()"),
            ),
            (
                HeaderName::from_static("cross-origin-opener-policy"),
                HeaderValue::from_static("same-origin"),
            ),
        ];

        Self {
            headers: headers.into(),
        }
    }
}

/// Origins, besides our own, that the checkout form may land on.
fn checkout_origins(config: &StorefrontConfig) -> Vec<String> {
    let own = Url::parse(&config.base_url)
        .map(|url| url.origin().ascii_serialization())
        .ok();

    let mut origins = Vec::new();
    if config.stripe.is_some() {
        origins.push(STRIPE_CHECKOUT_ORIGIN.to_string());
    }

    let gateway = config.checkout.endpoint.origin().ascii_serialization();
    if own.as_deref() != Some(gateway.as_str()) && !origins.contains(&gateway) {
        origins.push(gateway);
    }
    origins
}

fn content_security_policy(form_targets: &[String]) -> String {
    let mut form_action = String::from("'self'");
    for origin in form_targets {
        form_action.push(' ');
        form_action.push_str(origin);
    }

    format!(
        "default-src 'none'; script-src 'self'; style-src 'self'; \
         img-src 'self' https: data:; base-uri 'self'; \
         form-action {form_action}; frame-ancestors 'none'"
    )
}

/// Add the configured security headers. Pages carry a visitor's cart, so
/// responses without their own caching directive are kept out of shared
/// caches.
pub async fn security_headers_middleware(
    State(policy): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in policy.headers.iter() {
        headers.insert(name.clone(), value.clone());
    }
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("private, no-cache"));
    }

    response
}
