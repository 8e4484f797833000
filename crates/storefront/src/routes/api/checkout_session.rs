//! Checkout session creation.
//!
//! Visitors send product ids and quantities only. Every line is priced from
//! the server-side catalog before it reaches Stripe.

use axum::{Json, extract::State};
use double_take_core::{Catalog, CheckoutItem, CheckoutRequest, CheckoutSession};
use tracing::instrument;

use super::require_stripe;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stripe::CheckoutLineItem;

/// Create a Stripe Checkout Session and return its URL.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>> {
    let stripe = require_stripe(&state)?;

    let line_items = {
        let catalog = state.catalog().read().await;
        price_items(&catalog, &request.items)?
    };

    let config = state.config();
    let session = stripe
        .create_checkout_session(
            &line_items,
            &config.checkout_success_url(),
            &config.checkout_cancel_url(),
        )
        .await?;

    tracing::info!(session_id = %session.id, "Checkout session created");

    Ok(Json(CheckoutSession {
        url: Some(session.url),
    }))
}

/// Resolve each requested item against the catalog.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for an empty request, an unknown id, a
/// zero quantity, or a price that does not fit in cents.
fn price_items(catalog: &Catalog, items: &[CheckoutItem]) -> Result<Vec<CheckoutLineItem>> {
    if items.is_empty() {
        return Err(AppError::BadRequest("No items to check out".to_string()));
    }

    items
        .iter()
        .map(|item| {
            if item.qty == 0 {
                return Err(AppError::BadRequest(format!(
                    "Quantity for {} must be at least 1",
                    item.id
                )));
            }

            let product = catalog
                .get(&item.id)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown product {}", item.id)))?;

            let unit_amount = product.price.to_cents().ok_or_else(|| {
                AppError::BadRequest(format!("Price of {} is out of range", item.id))
            })?;

            Ok(CheckoutLineItem {
                name: product.title.clone(),
                unit_amount,
                quantity: item.qty,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use double_take_core::ProductId;

    use super::*;

    fn item(id: &str, qty: u32) -> CheckoutItem {
        CheckoutItem {
            id: ProductId::new(id),
            qty,
        }
    }

    #[test]
    fn test_prices_from_catalog() {
        let catalog = Catalog::seeded();

        let lines = price_items(&catalog, &[item("p1", 2), item("p3", 1)]).unwrap();

        assert_eq!(
            lines,
            vec![
                CheckoutLineItem {
                    name: "90s Floral Midi Dress".to_string(),
                    unit_amount: 4800,
                    quantity: 2,
                },
                CheckoutLineItem {
                    name: "Vintage Band Tee".to_string(),
                    unit_amount: 2800,
                    quantity: 1,
                },
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_product() {
        let catalog = Catalog::seeded();
        let result = price_items(&catalog, &[item("p99", 1)]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let catalog = Catalog::seeded();
        let result = price_items(&catalog, &[item("p1", 0)]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_empty_request() {
        let catalog = Catalog::seeded();
        assert!(price_items(&catalog, &[]).is_err());
    }
}
