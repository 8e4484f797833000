//! Admin form route handlers.
//!
//! A single form that appends products to the shared catalog. There is no
//! authentication; the page is linked from the shop header.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use double_take_core::ProductDraft;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::Notice;
use crate::models::session::flash;
use crate::state::AppState;

/// Admin page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    /// Values to pre-fill the form with.
    pub draft: ProductDraft,
    /// Validation message from a rejected submission.
    pub error: Option<String>,
    pub product_count: usize,
}

/// Display the empty admin form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    AdminTemplate {
        draft: ProductDraft::default(),
        error: None,
        product_count: state.catalog().read().await.len(),
    }
}

/// Submit the admin form.
///
/// A valid draft is appended to the catalog and the visitor is sent back to
/// the shop. An invalid draft re-renders the form with the typed values and
/// a `422 Unprocessable Entity` status.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductDraft>,
) -> Result<Response> {
    let mut draft = form;
    let result = {
        let mut catalog = state.catalog().write().await;
        draft.submit(&mut catalog).map_err(|e| (e, catalog.len()))
    };

    match result {
        Ok(product) => {
            add_breadcrumb(
                "admin",
                "Product added",
                Some(&[("product_id", product.id.as_str())]),
            );
            tracing::info!(product_id = %product.id, price = %product.price, "Product added");
            flash(&session, Notice::ProductAdded).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err((e, product_count)) => {
            tracing::debug!(error = %e, "Rejected admin submission");
            let page = AdminTemplate {
                draft,
                error: Some(e.to_string()),
                product_count,
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}
