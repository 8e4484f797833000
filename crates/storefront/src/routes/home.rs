//! Home page route handler.
//!
//! One page carries the whole shop: catalog grid with search, the cart
//! panel, checkout button, and policy text.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use double_take_core::{Cart, Product};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::CartView;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::Notice;
use crate::models::session::{load_cart, save_cart, take_notice};
use crate::state::AppState;

/// Shown when a product has no description.
pub const DESCRIPTION_PLACEHOLDER: &str = "Description will go here.";

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub description: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: product.price.to_string(),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
            image: product.image.clone(),
        }
    }
}

/// Notice banner display data.
#[derive(Clone)]
pub struct NoticeView {
    pub message: &'static str,
    pub is_error: bool,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            message: notice.message(),
            is_error: notice.is_error(),
        }
    }
}

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Catalog search text.
    #[serde(default)]
    pub q: String,
    /// Set by the hosted checkout on a completed payment.
    pub success: Option<String>,
    /// Set by the hosted checkout when the visitor backs out.
    pub canceled: Option<String>,
}

impl HomeQuery {
    fn is_success(&self) -> bool {
        self.success.as_deref() == Some("true")
    }

    fn is_canceled(&self) -> bool {
        self.canceled.as_deref() == Some("true")
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Products matching the search, in catalog order.
    pub products: Vec<ProductView>,
    /// Current search text.
    pub query: String,
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse> {
    let mut notice = take_notice(&session).await?;
    let mut cart = load_cart(&session).await?;

    if query.is_success() {
        cart = Cart::new();
        save_cart(&session, &cart).await?;
        notice = Some(Notice::OrderPlaced);
        add_breadcrumb("checkout", "Returned from completed checkout", None);
        tracing::info!("Visitor returned from completed checkout");
    } else if query.is_canceled() {
        notice = Some(Notice::CheckoutCanceled);
        add_breadcrumb("checkout", "Returned from canceled checkout", None);
    }

    let products: Vec<ProductView> = state
        .catalog()
        .read()
        .await
        .filter(&query.q)
        .map(ProductView::from)
        .collect();

    Ok(HomeTemplate {
        products,
        query: query.q,
        cart: CartView::from(&cart),
        notice: notice.map(NoticeView::from),
    })
}
