//! Stripe webhook receiver.
//!
//! Stripe is the system of record for payments, so a completed checkout is
//! logged and acknowledged. Nothing is stored.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde_json::{Value, json};
use tracing::instrument;

use super::require_stripe;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stripe::webhook::{CHECKOUT_SESSION_COMPLETED, WebhookEvent};

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Verify and log a Stripe event.
#[instrument(skip(state, headers, body))]
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let stripe = require_stripe(&state)?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Webhook("Missing Stripe-Signature header".to_string()))?;

    let event = stripe.construct_event(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook delivery");
        AppError::Webhook(e.to_string())
    })?;

    log_event(&event);

    Ok(Json(json!({ "received": true })))
}

fn log_event(event: &WebhookEvent) {
    if event.event_type != CHECKOUT_SESSION_COMPLETED {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignored webhook event");
        return;
    }

    let object = &event.data.object;
    let amount_total = object.get("amount_total").and_then(Value::as_i64);
    let currency = object.get("currency").and_then(Value::as_str);
    let customer_email = object
        .get("customer_details")
        .and_then(|details| details.get("email"))
        .or_else(|| object.get("customer_email"))
        .and_then(Value::as_str);

    tracing::info!(
        event_id = %event.id,
        session_id = event.object_id(),
        amount_total,
        currency,
        customer_email,
        "Payment success"
    );
}
