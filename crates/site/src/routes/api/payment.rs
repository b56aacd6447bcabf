//! Payment API routes: checkout session relay and webhook ingress.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use brightlane_core::{
    CHECKOUT_SESSION_COMPLETED, CheckoutRequest, PAYMENT_INTENT_FAILED, WebhookAck, WebhookEvent,
    checkout::{DEFAULT_CURRENCY, DEFAULT_DESCRIPTION},
};

use crate::state::AppState;

/// Rejection message when required checkout fields are absent.
const MISSING_FIELDS_MESSAGE: &str =
    "Amount, customer email, success URL, and cancel URL are required";

/// Inbound checkout session body.
///
/// Every field is optional at the serde level so that missing required
/// fields produce our fixed 400 message instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionBody {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutSessionBody {
    /// Validate required fields and fill in defaults.
    ///
    /// Zero and empty-string values count as missing, not just absent keys.
    fn into_request(self) -> Result<CheckoutRequest, &'static str> {
        let amount = self.amount.filter(|a| *a > 0);
        let customer_email = self.customer_email.filter(|s| !s.is_empty());
        let success_url = self.success_url.filter(|s| !s.is_empty());
        let cancel_url = self.cancel_url.filter(|s| !s.is_empty());

        match (amount, customer_email, success_url, cancel_url) {
            (Some(amount), Some(customer_email), Some(success_url), Some(cancel_url)) => {
                Ok(CheckoutRequest {
                    amount,
                    currency: self
                        .currency
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                    customer_email,
                    customer_name: self.customer_name.filter(|s| !s.is_empty()),
                    success_url,
                    cancel_url,
                    description: self
                        .description
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                    metadata: self.metadata,
                })
            }
            _ => Err(MISSING_FIELDS_MESSAGE),
        }
    }
}

/// `POST /api/payment/checkout-session`
///
/// Validates required fields, then relays the request to the upstream
/// payment service and the upstream's response back verbatim.
///
/// Transport failures return 502 with `success:false`. A synthesized
/// success payload here would mask real outages as paid sessions, so there
/// is no offline fallback.
#[instrument(skip(state, payload))]
pub async fn checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutSessionBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Invalid JSON body" })),
        )
            .into_response();
    };

    let request = match body.into_request() {
        Ok(request) => request,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": message })),
            )
                .into_response();
        }
    };

    match state.payments().create_checkout_session(&request).await {
        Ok(upstream) => {
            tracing::info!(status = upstream.status(), "Checkout session relayed");
            upstream.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reach payment service");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "success": false,
                    "message": "Failed to create checkout session with upstream API",
                })),
            )
                .into_response()
        }
    }
}

/// `POST /api/payment/webhook`
///
/// Acknowledges every parseable delivery with `{received:true}`. Events are
/// only logged; there is no signature verification, persistence, or
/// idempotency tracking, so replays and out-of-order deliveries land here
/// unguarded.
#[instrument(skip(payload))]
pub async fn webhook(payload: Result<Json<WebhookEvent>, JsonRejection>) -> Response {
    let Ok(Json(event)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Webhook handler failed" })),
        )
            .into_response();
    };

    match event.event_type.as_str() {
        CHECKOUT_SESSION_COMPLETED => {
            tracing::info!(session = ?event.object(), "Payment successful");
        }
        PAYMENT_INTENT_FAILED => {
            tracing::warn!(intent = ?event.object(), "Payment failed");
        }
        other => {
            tracing::info!(event_type = other, "Unhandled webhook type");
        }
    }

    Json(WebhookAck::RECEIVED).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body_from(json: serde_json::Value) -> CheckoutSessionBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_into_request_complete() {
        let body = body_from(json!({
            "amount": 135_000,
            "customerEmail": "ada@example.com",
            "successUrl": "https://example.com/ok",
            "cancelUrl": "https://example.com/cancel",
        }));

        let request = body.into_request().unwrap();
        assert_eq!(request.amount, 135_000);
        assert_eq!(request.currency, "usd");
        assert_eq!(request.description, "Project Payment");
        assert!(request.customer_name.is_none());
    }

    #[test]
    fn test_into_request_missing_each_required_field() {
        let complete = json!({
            "amount": 135_000,
            "customerEmail": "ada@example.com",
            "successUrl": "https://example.com/ok",
            "cancelUrl": "https://example.com/cancel",
        });

        for field in ["amount", "customerEmail", "successUrl", "cancelUrl"] {
            let mut incomplete = complete.clone();
            incomplete.as_object_mut().unwrap().remove(field);
            let result = body_from(incomplete).into_request();
            assert_eq!(result.unwrap_err(), MISSING_FIELDS_MESSAGE, "{field}");
        }
    }

    #[test]
    fn test_into_request_zero_amount_is_missing() {
        let body = body_from(json!({
            "amount": 0,
            "customerEmail": "ada@example.com",
            "successUrl": "https://example.com/ok",
            "cancelUrl": "https://example.com/cancel",
        }));
        assert!(body.into_request().is_err());
    }

    #[test]
    fn test_into_request_empty_email_is_missing() {
        let body = body_from(json!({
            "amount": 100,
            "customerEmail": "",
            "successUrl": "https://example.com/ok",
            "cancelUrl": "https://example.com/cancel",
        }));
        assert!(body.into_request().is_err());
    }

    #[test]
    fn test_into_request_keeps_overrides() {
        let body = body_from(json!({
            "amount": 100,
            "currency": "eur",
            "customerEmail": "ada@example.com",
            "customerName": "Ada",
            "successUrl": "https://example.com/ok",
            "cancelUrl": "https://example.com/cancel",
            "description": "Custom work",
            "metadata": {"visitorId": "v_1"},
        }));

        let request = body.into_request().unwrap();
        assert_eq!(request.currency, "eur");
        assert_eq!(request.customer_name.as_deref(), Some("Ada"));
        assert_eq!(request.description, "Custom work");
        assert_eq!(request.metadata.get("visitorId").unwrap(), "v_1");
    }
}
