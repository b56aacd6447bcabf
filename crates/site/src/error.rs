//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. The proxy routes construct it
//! for upstream failures; handlers with bespoke envelopes (the mutation
//! routes, local 400s) build their responses inline.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::UpstreamError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream backend call failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Upstream transport failure reported with a route-specific message.
    #[error("{message}")]
    Gateway {
        message: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // A missing token is a deployment mistake, not an upstream fault.
        let status = match &self {
            Self::Upstream(UpstreamError::MissingToken(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) | Self::Gateway { .. } => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Upstream(UpstreamError::MissingToken(var)) => {
                format!("Missing {var}. Please set it in the environment.")
            }
            Self::Upstream(_) => "Upstream error".to_string(),
            Self::Gateway { message, .. } => (*message).to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
