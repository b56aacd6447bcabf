//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::services::{PaymentClient, VisitorClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers never share mutable state; this
/// only carries configuration and the upstream clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    payments: PaymentClient,
    visitors: VisitorClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Both upstream clients share one connection pool.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let http = reqwest::Client::new();
        let payments = PaymentClient::new(http.clone(), &config.payment);
        let visitors = VisitorClient::new(http, &config.visitors);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                payments,
                visitors,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the payment service client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get a reference to the visitor service client.
    #[must_use]
    pub fn visitors(&self) -> &VisitorClient {
        &self.inner.visitors
    }
}
