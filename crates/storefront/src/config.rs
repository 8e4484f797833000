//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Stylesheet directory (default: crates/storefront/static)
//! - `CHECKOUT_ENDPOINT` - Checkout session endpoint
//!   (default: `{STOREFRONT_BASE_URL}/api/create-checkout-session`)
//! - `CHECKOUT_TIMEOUT_SECS` - Outbound checkout request timeout (default: 15)
//! - `STRIPE_SECRET_KEY` - Stripe API secret key; enables checkout session creation
//! - `STRIPE_WEBHOOK_SECRET` - Stripe webhook signing secret (required with the key)
//! - `STRIPE_API_BASE` - Stripe API root (default: <https://api.stripe.com/v1>)
//! - `STRIPE_CURRENCY` - ISO 4217 currency for line items (default: usd)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront, without a trailing slash
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Checkout gateway client configuration
    pub checkout: CheckoutConfig,
    /// Stripe configuration (checkout session creation and webhooks)
    pub stripe: Option<StripeConfig>,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Where the cart is sent to start a hosted checkout.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Endpoint accepting `{ items: [{ id, qty }] }` and returning `{ url }`
    pub endpoint: Url,
    /// Request timeout
    pub timeout: Duration,
}

/// Stripe API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_...`)
    pub secret_key: SecretString,
    /// Webhook signing secret (`whsec_...`)
    pub webhook_secret: SecretString,
    /// API root, overridable for testing
    pub api_base: String,
    /// Lowercase ISO 4217 currency code
    pub currency: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("currency", &self.currency)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        let static_dir =
            PathBuf::from(get_env_or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static"));

        let checkout = CheckoutConfig::from_env(&base_url)?;
        let stripe = StripeConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            checkout,
            stripe,
            log_json: get_env_or_default("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// URL Stripe sends the shopper to after paying.
    #[must_use]
    pub fn checkout_success_url(&self) -> String {
        format!("{}/?success=true", self.base_url)
    }

    /// URL Stripe sends the shopper to after backing out.
    #[must_use]
    pub fn checkout_cancel_url(&self) -> String {
        format!("{}/?canceled=true", self.base_url)
    }
}

impl CheckoutConfig {
    fn from_env(base_url: &str) -> Result<Self, ConfigError> {
        let default_endpoint = default_checkout_endpoint(base_url);
        let endpoint = get_env_or_default("CHECKOUT_ENDPOINT", &default_endpoint);
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            ConfigError::InvalidEnvVar("CHECKOUT_ENDPOINT".to_string(), e.to_string())
        })?;
        let timeout = Duration::from_secs(parse_env("CHECKOUT_TIMEOUT_SECS", "15")?);

        Ok(Self { endpoint, timeout })
    }
}

impl StripeConfig {
    /// Stripe is optional; it is enabled by setting `STRIPE_SECRET_KEY`.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        if get_optional_env("STRIPE_SECRET_KEY").is_none() {
            return Ok(None);
        }

        Ok(Some(Self {
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            webhook_secret: get_validated_secret("STRIPE_WEBHOOK_SECRET")?,
            api_base: get_env_or_default("STRIPE_API_BASE", "https://api.stripe.com/v1")
                .trim_end_matches('/')
                .to_string(),
            currency: get_env_or_default("STRIPE_CURRENCY", "usd").to_lowercase(),
        }))
    }
}

/// `{base_url}/api/create-checkout-session`
#[must_use]
pub fn default_checkout_endpoint(base_url: &str) -> String {
    format!(
        "{}/api/create-checkout-session",
        base_url.trim_end_matches('/')
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key from the Stripe dashboard."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from("static"),
            checkout: CheckoutConfig {
                endpoint: Url::parse("http://localhost:3000/api/create-checkout-session")
                    .unwrap(),
                timeout: Duration::from_secs(15),
            },
            stripe: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-stripe-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_stripe_shaped_key() {
        let result = validate_secret_strength("sk_test_51Hq8ZfK2jW9mXcRtLp4VbN7yD", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_checkout_return_urls() {
        let config = test_config();
        assert!(!config.is_secure());
        assert_eq!(
            config.checkout_success_url(),
            "http://localhost:3000/?success=true"
        );
        assert_eq!(
            config.checkout_cancel_url(),
            "http://localhost:3000/?canceled=true"
        );
    }

    #[test]
    fn test_default_checkout_endpoint_strips_trailing_slash() {
        assert_eq!(
            default_checkout_endpoint("https://shop.test/"),
            "https://shop.test/api/create-checkout-session"
        );
    }

    #[test]
    fn test_stripe_config_debug_redacts_secrets() {
        let config = StripeConfig {
            secret_key: SecretString::from("sk_live_super_secret_value"),
            webhook_secret: SecretString::from("whsec_super_secret_value"),
            api_base: "https://api.stripe.com/v1".to_string(),
            currency: "usd".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("api.stripe.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_live_super_secret_value"));
        assert!(!debug_output.contains("whsec_super_secret_value"));
    }
}
