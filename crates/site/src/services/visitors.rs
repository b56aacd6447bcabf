//! Visitor service client.
//!
//! Relays CRUD calls to the upstream visitor API and submits registration
//! payloads from the get-started form. The CRUD relay requires the bearer
//! token on every call; registration attaches it when configured.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use brightlane_core::VisitorRecord;

use crate::config::UpstreamServiceConfig;
use crate::services::{UpstreamError, UpstreamResponse};

/// Upstream path prefix for visitor CRUD.
const VISITOR_PATH: &str = "/api/visitor";

/// Upstream path for form registrations.
const REGISTER_PATH: &str = "/api/visitor/register";

/// Client for the upstream visitor service.
#[derive(Clone)]
pub struct VisitorClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl VisitorClient {
    /// Create a new visitor client sharing the given HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &UpstreamServiceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// The bearer token, or the error the relay routes surface when it is
    /// absent. Token enforcement is uniform across all visitor relay
    /// methods.
    fn require_token(&self) -> Result<&SecretString, UpstreamError> {
        self.token
            .as_ref()
            .ok_or(UpstreamError::MissingToken("VISITORS_API_TOKEN"))
    }

    /// `GET {base}/api/visitor{?query}` - list visitors, forwarding the
    /// inbound query string untouched.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before any network call when no token is
    /// configured, or `Http` on transport failure.
    #[instrument(skip(self))]
    pub async fn list(&self, query: Option<&str>) -> Result<UpstreamResponse, UpstreamError> {
        let token = self.require_token()?;
        let mut url = format!("{}{VISITOR_PATH}", self.base_url);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        UpstreamResponse::read(response).await
    }

    /// `POST {base}/api/visitor` - create a visitor from a relayed JSON
    /// body.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before any network call when no token is
    /// configured, or `Http` on transport failure.
    #[instrument(skip(self, body))]
    pub async fn create(
        &self,
        body: &serde_json::Value,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{VISITOR_PATH}", self.base_url);
        self.send_json(Method::POST, &url, body).await
    }

    /// `PUT {base}/api/visitor/{id}` - update a visitor.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before any network call when no token is
    /// configured, or `Http` on transport failure.
    #[instrument(skip(self, body))]
    pub async fn update(
        &self,
        id: &str,
        body: &serde_json::Value,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{VISITOR_PATH}/{id}", self.base_url);
        self.send_json(Method::PUT, &url, body).await
    }

    /// `DELETE {base}/api/visitor/{id}` - delete a visitor.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` before any network call when no token is
    /// configured, or `Http` on transport failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<UpstreamResponse, UpstreamError> {
        let token = self.require_token()?;
        let url = format!("{}{VISITOR_PATH}/{id}", self.base_url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        UpstreamResponse::read(response).await
    }

    /// `POST {base}/api/visitor/register` - submit a registration payload
    /// from the get-started form.
    ///
    /// Unlike the CRUD relay this does not require a token; the register
    /// endpoint is public and the token is attached only when configured.
    ///
    /// # Errors
    ///
    /// Returns `Http` on transport failure.
    #[instrument(skip(self, record), fields(email = %record.business_email))]
    pub async fn register(
        &self,
        record: &VisitorRecord,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{REGISTER_PATH}", self.base_url);

        let mut builder = self
            .client
            .post(&url)
            .json(record)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await?;
        UpstreamResponse::read(response).await
    }

    /// Shared POST/PUT body relay.
    async fn send_json(
        &self,
        method: Method,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let token = self.require_token()?;

        let response = self
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        UpstreamResponse::read(response).await
    }
}
