//! Wire types for the hosted checkout session flow.
//!
//! The upstream payment service speaks camelCase JSON. The request shape
//! mirrors `POST /api/v1/payment/create-checkout-session`; the response is
//! whatever the service hands back, which the proxy relays verbatim and
//! the funnel parses just enough to find the redirect URL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default currency when the caller omits one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Default description when the caller omits one.
pub const DEFAULT_DESCRIPTION: &str = "Project Payment";

/// A checkout session creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Amount in minor currency units (cents for USD).
    pub amount: i64,
    pub currency: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub description: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// The upstream's answer to a checkout session request.
///
/// Nothing here is verified against the request; the upstream's bookkeeping
/// is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CheckoutSessionData>,
}

/// Session identifiers and the hosted checkout redirect URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionData {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CheckoutSessionResponse {
    /// The redirect URL, if the upstream reported success and included a
    /// non-empty one.
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| d.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}
