//! Payment service client.
//!
//! Wraps the upstream's checkout session endpoint. The proxy route relays
//! the response verbatim; the funnel parses it for the redirect URL.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use brightlane_core::CheckoutRequest;

use crate::config::UpstreamServiceConfig;
use crate::services::{UpstreamError, UpstreamResponse};

/// Upstream path for checkout session creation.
const CREATE_CHECKOUT_SESSION_PATH: &str = "/api/v1/payment/create-checkout-session";

/// Client for the upstream payment service.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl PaymentClient {
    /// Create a new payment client sharing the given HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &UpstreamServiceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Ask the upstream for a hosted checkout session.
    ///
    /// The bearer token is attached when configured; the upstream rejects
    /// unauthenticated calls itself.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Http` on transport failure. Upstream 4xx/5xx
    /// responses are NOT errors; they come back as an [`UpstreamResponse`]
    /// for the caller to relay or interpret.
    #[instrument(skip(self, request), fields(amount = request.amount))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{CREATE_CHECKOUT_SESSION_PATH}", self.base_url);

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await?;
        UpstreamResponse::read(response).await
    }
}
