//! Stripe webhook signature verification and event parsing.
//!
//! Stripe signs each delivery with the endpoint secret. The
//! `Stripe-Signature` header looks like `t=1700000000,v1=<hex>,v1=<hex>`
//! and the signed payload is `"{t}.{raw body}"`.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use super::StripeError;

/// Maximum age of a signed delivery, in seconds.
pub const TOLERANCE_SECS: i64 = 300;

/// Event type emitted when a hosted checkout completes.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// A Stripe event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// The `data` member of an event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// The `id` of the event's data object, if it has one.
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(serde_json::Value::as_str)
    }
}

/// Verify a `Stripe-Signature` header against the raw payload.
///
/// `now` is the current unix time in seconds.
///
/// # Errors
///
/// Returns [`StripeError::InvalidSignature`] if the header is malformed,
/// the timestamp is outside the tolerance, or no `v1` signature matches.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), StripeError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| StripeError::InvalidSignature("Missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(StripeError::InvalidSignature(
            "No v1 signature".to_string(),
        ));
    }

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| StripeError::InvalidSignature("Invalid timestamp".to_string()))?;

    let skew = now.checked_sub(ts).map(i64::unsigned_abs);
    if skew.is_none_or(|skew| skew > TOLERANCE_SECS.unsigned_abs()) {
        return Err(StripeError::InvalidSignature(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let expected = sign(payload, timestamp, secret)?;

    if !signatures
        .iter()
        .any(|candidate| constant_time_compare(&expected, candidate))
    {
        return Err(StripeError::InvalidSignature(
            "Signature mismatch".to_string(),
        ));
    }

    debug!("Stripe signature verified");

    Ok(())
}

/// Compute the hex `v1` signature for a payload at `timestamp`.
///
/// # Errors
///
/// Returns [`StripeError::InvalidSignature`] if the key is rejected.
pub fn sign(payload: &[u8], timestamp: &str, secret: &str) -> Result<String, StripeError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| StripeError::InvalidSignature(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_signing_secret";
    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_test_1"}}}"#;

    fn header_at(ts: i64, body: &[u8]) -> String {
        let t = ts.to_string();
        format!("t={t},v1={}", sign(body, &t, SECRET).unwrap())
    }

    #[test]
    fn test_valid_signature() {
        assert!(verify_signature(BODY, &header_at(NOW, BODY), SECRET, NOW).is_ok());
    }

    #[test]
    fn test_any_v1_may_match() {
        let valid = header_at(NOW, BODY);
        let header = format!("t={NOW},v1=deadbeef,{}", valid.split_once(',').unwrap().1);
        assert!(verify_signature(BODY, &header, SECRET, NOW).is_ok());
    }

    #[test]
    fn test_tampered_body() {
        let header = header_at(NOW, BODY);
        let result = verify_signature(b"{\"id\":\"evt_2\"}", &header, SECRET, NOW);
        assert!(matches!(result, Err(StripeError::InvalidSignature(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let header = header_at(NOW, BODY);
        assert!(verify_signature(BODY, &header, "whsec_other", NOW).is_err());
    }

    #[test]
    fn test_stale_timestamp() {
        let header = header_at(NOW - 600, BODY);
        assert!(verify_signature(BODY, &header, SECRET, NOW).is_err());
    }

    #[test]
    fn test_within_tolerance() {
        let header = header_at(NOW - 120, BODY);
        assert!(verify_signature(BODY, &header, SECRET, NOW).is_ok());
    }

    #[test]
    fn test_extreme_timestamps_rejected() {
        for ts in [i64::MIN, i64::MAX] {
            let header = header_at(ts, BODY);
            assert!(matches!(
                verify_signature(BODY, &header, SECRET, NOW),
                Err(StripeError::InvalidSignature(_))
            ));
        }
    }

    #[test]
    fn test_malformed_headers() {
        for header in ["", "garbage", "v1=abc", "t=123", "t=soon,v1=abc"] {
            assert!(
                verify_signature(BODY, header, SECRET, NOW).is_err(),
                "{header} should be rejected"
            );
        }
    }

    #[test]
    fn test_event_parsing() {
        let event: WebhookEvent = serde_json::from_slice(BODY).unwrap();
        assert_eq!(event.event_type, CHECKOUT_SESSION_COMPLETED);
        assert_eq!(event.object_id(), Some("cs_test_1"));
    }
}
