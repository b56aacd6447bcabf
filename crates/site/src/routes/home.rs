//! Marketing home page.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

/// A service card on the home page.
pub struct Service {
    pub title: &'static str,
    pub blurb: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub services: Vec<Service>,
}

/// `GET /`
#[instrument]
pub async fn page() -> HomeTemplate {
    HomeTemplate {
        services: vec![
            Service {
                title: "Custom Development",
                blurb: "Web applications built to order, from scoping through launch.",
            },
            Service {
                title: "Product Design",
                blurb: "Interfaces and flows shaped around how your customers actually work.",
            },
            Service {
                title: "Ongoing Support",
                blurb: "Maintenance, monitoring, and iteration after the handover.",
            },
        ],
    }
}
