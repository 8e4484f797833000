//! End-to-end test harness for the Double Take Vintage storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p double-take-integration-tests
//! ```
//!
//! Each test boots the real router on an ephemeral port with its own
//! catalog and session store. Outbound services (the checkout gateway and
//! the Stripe API) are replaced by [`FakeServer`]s that record every
//! request and answer with a canned response.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
};
use double_take_storefront::config::{
    CheckoutConfig, StorefrontConfig, StripeConfig, default_checkout_endpoint,
};
use double_take_storefront::state::AppState;
use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;
use url::Url;

/// Stripe secret key used by test configurations.
pub const TEST_STRIPE_KEY: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

/// Stripe webhook signing secret used by test configurations.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_3kPq9ZrT7vWx2mNb";

/// A storefront running on an ephemeral port.
pub struct TestApp {
    pub base_url: String,
    /// Client with a cookie jar (one visitor) that does not follow redirects.
    pub client: Client,
}

impl TestApp {
    /// Start a storefront with the default test configuration.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Start a storefront after adjusting its configuration.
    pub async fn spawn_with(configure: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}");

        let mut config = test_config(&base_url);
        configure(&mut config);

        let state = AppState::new(config).expect("Failed to build application state");
        let app = double_take_storefront::app(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url,
            client: visitor(),
        }
    }

    /// Absolute URL for a path on this storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A second visitor with an empty cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Client {
        visitor()
    }

    /// Fetch the home page HTML.
    pub async fn home(&self) -> String {
        self.get_text(&self.client, "/").await
    }

    /// Fetch the cart count badge fragment.
    pub async fn cart_count(&self) -> String {
        self.get_text(&self.client, "/cart/count").await
    }

    /// GET a path with a given client and return the body.
    pub async fn get_text(&self, client: &Client, path: &str) -> String {
        let response = client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.text().await.expect("Failed to read body")
    }

    /// POST a form as the default visitor.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Add one unit of a product to the default visitor's cart.
    pub async fn add_to_cart(&self, product_id: &str) {
        let response = self
            .post_form("/cart/add", &[("product_id", product_id)])
            .await;
        assert_see_other(&response, "/");
    }
}

/// Configuration pointing at nothing external.
#[must_use]
pub fn test_config(base_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        base_url: base_url.to_string(),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
        checkout: CheckoutConfig {
            endpoint: Url::parse(&default_checkout_endpoint(base_url)).expect("valid url"),
            timeout: Duration::from_secs(5),
        },
        stripe: None,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Stripe configuration aimed at a fake Stripe API.
#[must_use]
pub fn test_stripe_config(api_base: String) -> StripeConfig {
    StripeConfig {
        secret_key: SecretString::from(TEST_STRIPE_KEY),
        webhook_secret: SecretString::from(TEST_WEBHOOK_SECRET),
        api_base,
        currency: "usd".to_string(),
    }
}

fn visitor() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Assert a `303 See Other` pointing at `location`.
pub fn assert_see_other(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

/// A request captured by a [`FakeServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    body: Value,
}

/// Throwaway HTTP server standing in for an outbound dependency.
///
/// Every request, whatever its path, is recorded and answered with the same
/// status and JSON body.
pub struct FakeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeServer {
    /// Start a server answering `status` with `body`.
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            requests: Arc::clone(&requests),
            status,
            body,
        };

        let app = Router::new().fallback(record).with_state(recorder);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake server");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("recorder lock").clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.requests.lock().expect("recorder lock").len()
    }
}

async fn record(
    State(recorder): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    recorder
        .requests
        .lock()
        .expect("recorder lock")
        .push(RecordedRequest {
            path: uri.path().to_string(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
            body,
        });

    (recorder.status, Json(recorder.body))
}

/// An address nothing is listening on.
pub async fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{addr}")
}
