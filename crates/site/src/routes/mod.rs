//! HTTP route handlers for the Brightlane site.
//!
//! Route table:
//!
//! | Method | Path                             | Handler                          |
//! |--------|----------------------------------|----------------------------------|
//! | GET    | `/`                              | [`home::page`]                   |
//! | GET    | `/health`                        | [`health`]                       |
//! | GET    | `/get-started`                   | [`get_started::page`]            |
//! | POST   | `/get-started/register`          | [`get_started::register`]        |
//! | POST   | `/get-started/checkout`          | [`get_started::checkout`]        |
//! | GET    | `/get-started/success`           | [`success::page`]                |
//! | POST   | `/api/payment/checkout-session`  | [`api::payment::checkout_session`] |
//! | POST   | `/api/payment/webhook`           | [`api::payment::webhook`]        |
//! | GET    | `/api/visitors`                  | [`api::visitors::list`]          |
//! | POST   | `/api/visitors`                  | [`api::visitors::create`]        |
//! | PUT    | `/api/visitors/{id}`             | [`api::visitors::update`]        |
//! | DELETE | `/api/visitors/{id}`             | [`api::visitors::remove`]        |

pub mod api;
pub mod get_started;
pub mod home;
pub mod success;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// The JSON relay surface under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/payment/checkout-session", post(api::payment::checkout_session))
        .route("/payment/webhook", post(api::payment::webhook))
        .route("/visitors", get(api::visitors::list).post(api::visitors::create))
        .route(
            "/visitors/{id}",
            put(api::visitors::update).delete(api::visitors::remove),
        )
}

/// The browser-facing funnel under `/get-started`.
fn funnel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_started::page))
        .route("/register", post(get_started::register))
        .route("/checkout", post(get_started::checkout))
        .route("/success", get(success::page))
}

/// Assemble the full router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::page))
        .route("/health", get(health))
        .nest("/get-started", funnel_routes())
        .nest("/api", api_routes())
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}
