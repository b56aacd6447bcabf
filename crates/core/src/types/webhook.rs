//! Payment provider webhook events.
//!
//! Events arrive as `{type, data}` JSON and are discriminated by matching
//! the `type` string. There is intentionally no schema validation beyond
//! that: unknown types are acknowledged like everything else.

use serde::{Deserialize, Serialize};

/// A checkout session finished and the payment succeeded.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// A payment attempt failed.
pub const PAYMENT_INTENT_FAILED: &str = "payment_intent.payment_failed";

/// An asynchronous notification from the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Empty when the provider omitted a `type`; such deliveries fall to
    /// the unhandled branch and are still acknowledged.
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WebhookEvent {
    /// The nested event object, when the provider nests one under
    /// `data.object`.
    #[must_use]
    pub fn object(&self) -> Option<&serde_json::Value> {
        self.data.get("object")
    }
}

/// The acknowledgment every webhook delivery gets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    /// The only acknowledgment we ever send.
    pub const RECEIVED: Self = Self { received: true };
}
