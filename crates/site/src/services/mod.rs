//! Upstream service clients.
//!
//! Both backends are opaque HTTP collaborators. The clients here share one
//! relay shape: forward a request with a static bearer token and hand the
//! upstream's status, body, and content type back untouched. No retries,
//! no caching, no idempotency keys.

pub mod payments;
pub mod visitors;

pub use payments::PaymentClient;
pub use visitors::VisitorClient;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur when talking to an upstream backend.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport-level failure (connect, send, or read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A route that requires a bearer token was called without one
    /// configured.
    #[error("Missing {0}. Please set it in the environment.")]
    MissingToken(&'static str),
}

/// An upstream response captured for verbatim relay.
///
/// Status and content type are preserved as received; a missing content
/// type defaults to `application/json` on the way out.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl UpstreamResponse {
    /// Drain a `reqwest` response into a relayable form.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the upstream body fails.
    pub async fn read(response: reqwest::Response) -> Result<Self, UpstreamError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    /// The upstream HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the upstream reported a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Whether the upstream declared a JSON body.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// The raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as lossy UTF-8, for status-message mapping.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the body does not
    /// deserialize into `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    #[cfg(test)]
    fn from_parts(status: u16, content_type: Option<&str>, body: &[u8]) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_owned),
            body: body.to_vec(),
        }
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = self
            .content_type
            .unwrap_or_else(|| "application/json".to_string());
        (status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}
