//! Integration tests for Brightlane.
//!
//! Each test spawns the site router in-process on an ephemeral port,
//! alongside mock upstream services built from plain axum routers. No
//! external processes or credentials are needed:
//!
//! ```bash
//! cargo test -p brightlane-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_session` - Checkout session relay under `/api/payment`
//! - `visitors_proxy` - Visitor CRUD relay under `/api/visitors`
//! - `webhook` - Webhook acknowledgment
//! - `registration` - Registration form funnel
//! - `success_page` - Post-checkout success page

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use secrecy::SecretString;

use brightlane_site::config::{SiteConfig, UpstreamServiceConfig};
use brightlane_site::routes;
use brightlane_site::state::AppState;

/// Bearer token used for mock upstreams. High-entropy so it passes the
/// same validation production tokens get.
pub const TEST_TOKEN: &str = "kQ3vXp9mC4Lr7sB1tZ8wN5eJ6hD2gF0a";

/// A running site instance bound to an ephemeral port.
pub struct TestSite {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestSite {
    /// Absolute URL for a site path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Spawn the full site router with the given configuration.
pub async fn spawn_site(config: SiteConfig) -> TestSite {
    let state = AppState::new(config);
    let app = Router::new().merge(routes::routes()).with_state(state);
    let base_url = serve(app).await;

    // Redirects are asserted on directly, never followed.
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    TestSite { base_url, client }
}

/// Spawn a mock upstream service and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    serve(router).await
}

/// Bind an ephemeral port and serve the router in the background.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    format!("http://{addr}")
}

/// A site configuration pointing at the given upstreams, with tokens set
/// and the success-page verification delay zeroed out.
#[must_use]
pub fn test_config(payment_url: &str, visitors_url: &str) -> SiteConfig {
    SiteConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://site.test".to_string(),
        payment: UpstreamServiceConfig {
            base_url: payment_url.trim_end_matches('/').to_string(),
            token: Some(SecretString::from(TEST_TOKEN)),
        },
        visitors: UpstreamServiceConfig {
            base_url: visitors_url.trim_end_matches('/').to_string(),
            token: Some(SecretString::from(TEST_TOKEN)),
        },
        verify_delay: Duration::from_millis(0),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Like [`test_config`] but with no bearer tokens configured.
#[must_use]
pub fn test_config_without_tokens(payment_url: &str, visitors_url: &str) -> SiteConfig {
    let mut config = test_config(payment_url, visitors_url);
    config.payment.token = None;
    config.visitors.token = None;
    config
}
