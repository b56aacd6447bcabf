//! Visitor CRUD relay routes.
//!
//! Each handler forwards one call to the upstream visitor service and
//! relays the upstream's status, body, and content type verbatim. The
//! bearer token is required uniformly: its absence is a configuration
//! error (500) surfaced before any network call.
//!
//! Failure statuses mirror the public API contract: list/create report 502
//! on transport failure, update/delete report 500 with the caught message.

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use crate::error::AppError;
use crate::services::UpstreamError;
use crate::state::AppState;

/// `GET /api/visitors?<query>`
///
/// Forwards the query string untouched to `GET {base}/api/visitor`.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    match state.visitors().list(query.as_deref()).await {
        Ok(upstream) => upstream.into_response(),
        Err(e @ UpstreamError::MissingToken(_)) => AppError::from(e).into_response(),
        Err(e) => AppError::Gateway {
            message: "Failed to fetch visitors from upstream API",
            source: e,
        }
        .into_response(),
    }
}

/// `POST /api/visitors`
///
/// Relays the JSON body to `POST {base}/api/visitor`. Malformed inbound
/// JSON is rejected locally with 400.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid JSON body" })),
        )
            .into_response();
    };

    match state.visitors().create(&body).await {
        Ok(upstream) => upstream.into_response(),
        Err(e @ UpstreamError::MissingToken(_)) => AppError::from(e).into_response(),
        Err(e) => AppError::Gateway {
            message: "Failed to register visitor with upstream API",
            source: e,
        }
        .into_response(),
    }
}

/// `PUT /api/visitors/{id}`
///
/// Relays the JSON body to `PUT {base}/api/visitor/{id}`.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return mutation_failure("Failed to update visitor", "Invalid JSON body");
    };

    match state.visitors().update(&id, &body).await {
        Ok(upstream) => upstream.into_response(),
        Err(e) => {
            tracing::error!(error = %e, visitor_id = %id, "Failed to update visitor upstream");
            mutation_failure("Failed to update visitor", &e.to_string())
        }
    }
}

/// `DELETE /api/visitors/{id}`
///
/// Relays to `DELETE {base}/api/visitor/{id}`.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.visitors().delete(&id).await {
        Ok(upstream) => upstream.into_response(),
        Err(e) => {
            tracing::error!(error = %e, visitor_id = %id, "Failed to delete visitor upstream");
            mutation_failure("Failed to delete visitor", &e.to_string())
        }
    }
}

/// The 500 envelope the mutation routes use for every failure.
fn mutation_failure(message: &str, error: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "status": 500,
            "message": message,
            "error": error,
        })),
    )
        .into_response()
}
