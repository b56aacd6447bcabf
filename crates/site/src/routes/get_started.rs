//! Get-started funnel route handlers.
//!
//! The funnel page carries the registration form (submitted via HTMX,
//! answered with fragments) and the proceed options, of which "secure my
//! project" posts to the checkout handler and ends in a redirect to the
//! hosted checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderValue, header::HeaderName},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tracing::instrument;

use brightlane_core::{
    BusinessType, CheckoutRequest, CheckoutSessionResponse, ClientId, Email, ProjectEstimate,
    ReferralSource, VisitorRecord, checkout::DEFAULT_CURRENCY,
};

use crate::state::AppState;

/// Customer fallbacks for checkouts started without a registration.
const GUEST_EMAIL: &str = "guest@brightlane.dev";
const GUEST_NAME: &str = "Guest User";

/// Deposit checkout line-item description.
const DEPOSIT_DESCRIPTION: &str = "Project Development - 25% Deposit";

/// HTMX request marker header.
const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");

/// HTMX client-side redirect header.
const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

/// HTMX response header overriding the swap target.
const HX_RETARGET: HeaderName = HeaderName::from_static("hx-retarget");

// =============================================================================
// Templates
// =============================================================================

/// Funnel page: registration form + proceed options.
#[derive(Template, WebTemplate)]
#[template(path = "get_started/page.html")]
pub struct GetStartedTemplate {
    pub estimate: String,
    pub deposit: String,
    pub business_types: Vec<&'static str>,
    pub referral_sources: Vec<&'static str>,
    pub payment_error: Option<String>,
}

impl GetStartedTemplate {
    fn new(payment_error: Option<String>) -> Self {
        let estimate = ProjectEstimate::standard();
        Self {
            estimate: format_dollars(estimate.total_dollars().to_i64().unwrap_or(0)),
            deposit: format_dollars(estimate.deposit_dollars().to_i64().unwrap_or(0)),
            business_types: BusinessType::ALL.iter().map(|t| t.label()).collect(),
            referral_sources: ReferralSource::ALL.iter().map(|s| s.label()).collect(),
            payment_error,
        }
    }
}

/// Registration success fragment (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "get_started/register_success.html")]
pub struct RegisterSuccessTemplate {
    pub message: String,
}

/// Registration error fragment (replaces the form feedback via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "get_started/register_error.html")]
pub struct RegisterErrorTemplate {
    pub message: String,
    pub full_name_error: Option<String>,
    pub business_email_error: Option<String>,
}

// =============================================================================
// Page
// =============================================================================

/// `GET /get-started`
///
/// Always serves a fresh form; the registered/disabled state lives entirely
/// in the swapped fragment.
#[instrument]
pub async fn page() -> GetStartedTemplate {
    GetStartedTemplate::new(None)
}

// =============================================================================
// Registration
// =============================================================================

/// Registration form fields. Everything beyond name and email is optional
/// free text.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub business_email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_website: String,
    #[serde(default)]
    pub business_address: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub referral_source: String,
}

/// Field-level validation failures.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegistrationErrors {
    pub full_name: Option<String>,
    pub business_email: Option<String>,
}

/// Validate the form and build the upstream payload.
///
/// Mirrors the form's own rules: trimmed full name required, email required
/// and permissively shaped. All other fields pass through trimmed.
fn validate_registration(form: &RegisterForm) -> Result<VisitorRecord, RegistrationErrors> {
    let mut errors = RegistrationErrors::default();

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        errors.full_name = Some("Full name is required".to_string());
    }

    let email_input = form.business_email.trim();
    let email = if email_input.is_empty() {
        errors.business_email = Some("Email is required".to_string());
        None
    } else {
        match Email::parse(email_input) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.business_email =
                    Some("Please enter a valid email address".to_string());
                None
            }
        }
    };

    match (errors.full_name.is_none(), email) {
        (true, Some(business_email)) => Ok(VisitorRecord {
            full_name: full_name.to_string(),
            business_email,
            phone_number: form.phone_number.trim().to_string(),
            company_name: form.company_name.trim().to_string(),
            company_website: form.company_website.trim().to_string(),
            business_address: form.business_address.trim().to_string(),
            business_type: BusinessType::from_label(form.business_type.trim()),
            referral_source: ReferralSource::from_label(form.referral_source.trim()),
            timestamp: Utc::now(),
            client_id: ClientId::generate(),
        }),
        _ => Err(errors),
    }
}

/// `POST /get-started/register`
///
/// Validates locally, submits to the upstream visitor service, and maps
/// the response onto the canned user-facing messages. Validation failures
/// never reach the network.
#[instrument(skip(state, form), fields(email = %form.business_email))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let record = match validate_registration(&form) {
        Ok(record) => record,
        Err(errors) => {
            return RegisterErrorTemplate {
                message: "Please fill in all required fields correctly".to_string(),
                full_name_error: errors.full_name,
                business_email_error: errors.business_email,
            }
            .into_response();
        }
    };

    match state.visitors().register(&record).await {
        Ok(upstream) => {
            tracing::info!(status = upstream.status(), "Registration submitted");
            registration_response(upstream.status(), upstream.is_json(), &upstream.text())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration submission failed");
            RegisterErrorTemplate {
                message: "Network error. Please check your connection and try again.".to_string(),
                full_name_error: None,
                business_email_error: None,
            }
            .into_response()
        }
    }
}

/// Partial view of the upstream registration reply.
#[derive(Debug, Default, Deserialize)]
struct RegistrationResult {
    success: Option<bool>,
    message: Option<String>,
}

/// Map an upstream registration reply onto a fragment.
///
/// JSON bodies are read for `success`/`message`; any non-JSON 2xx body is a
/// generic success. Error statuses get the fixed messages, with 409 taking
/// its own "already registered" path.
fn registration_response(status: u16, is_json: bool, body: &str) -> Response {
    let result: RegistrationResult = if is_json {
        serde_json::from_str(body).unwrap_or_default()
    } else {
        RegistrationResult {
            success: None,
            message: (!body.is_empty()).then(|| body.to_string()),
        }
    };

    let ok = (200..300).contains(&status);
    if ok && result.success != Some(false) {
        // Swap out the whole panel so the form disappears until the
        // visitor explicitly asks to register again.
        let mut response = RegisterSuccessTemplate {
            message: result
                .message
                .unwrap_or_else(|| "Registration successful! Welcome aboard!".to_string()),
        }
        .into_response();
        response
            .headers_mut()
            .insert(HX_RETARGET, HeaderValue::from_static("#register-panel"));
        return response;
    }

    // 409 short-circuits with its own message before the generic mapping.
    if status == 409 {
        return RegisterErrorTemplate {
            message: result
                .message
                .unwrap_or_else(|| "This email is already registered.".to_string()),
            full_name_error: None,
            business_email_error: None,
        }
        .into_response();
    }

    let message = match status {
        400 => result
            .message
            .unwrap_or_else(|| "Invalid data provided. Please check your information.".to_string()),
        422 => result
            .message
            .unwrap_or_else(|| "Please check your information and try again.".to_string()),
        500 => "Server error. Please try again later.".to_string(),
        503 => "Service temporarily unavailable. Please try again later.".to_string(),
        other => result
            .message
            .unwrap_or_else(|| format!("Error {other}: Registration failed.")),
    };

    RegisterErrorTemplate {
        message,
        full_name_error: None,
        business_email_error: None,
    }
    .into_response()
}

// =============================================================================
// Checkout
// =============================================================================

/// Checkout form fields, carried over from the registration step when the
/// visitor filled it in.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub business_email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub visitor_id: String,
}

/// Build the 25% deposit checkout request.
///
/// Success/cancel URLs are derived from the configured public base URL;
/// the `{CHECKOUT_SESSION_ID}` placeholder is substituted by the payment
/// provider at redirect time.
fn build_deposit_request(base_url: &str, form: &CheckoutForm) -> CheckoutRequest {
    let estimate = ProjectEstimate::standard();

    let email = non_empty(&form.business_email).unwrap_or(GUEST_EMAIL);
    let name = non_empty(&form.full_name).unwrap_or(GUEST_NAME);
    let visitor_id = non_empty(&form.visitor_id).unwrap_or("guest");

    CheckoutRequest {
        amount: estimate.deposit_minor_units(),
        currency: DEFAULT_CURRENCY.to_string(),
        customer_email: email.to_string(),
        customer_name: Some(name.to_string()),
        success_url: format!("{base_url}/get-started/success?session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{base_url}/get-started?step=payment"),
        description: DEPOSIT_DESCRIPTION.to_string(),
        metadata: [
            ("visitorId".to_string(), visitor_id.to_string()),
            ("projectType".to_string(), "custom_development".to_string()),
            ("depositPercentage".to_string(), "25".to_string()),
        ]
        .into_iter()
        .collect(),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// `POST /get-started/checkout`
///
/// Requests a hosted checkout session for the deposit and redirects the
/// browser to it (303). Anything short of a usable redirect URL re-renders
/// the funnel page with an inline error.
#[instrument(skip(state, headers, form))]
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let request = build_deposit_request(&state.config().base_url, &form);

    let upstream = match state.payments().create_checkout_session(&request).await {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(error = %e, "Checkout session request failed");
            return GetStartedTemplate::new(Some(
                "Network error. Please try again.".to_string(),
            ))
            .into_response();
        }
    };

    let result: CheckoutSessionResponse = match upstream.json() {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, status = upstream.status(), "Unparseable checkout session response");
            return GetStartedTemplate::new(Some(
                "Failed to create payment session".to_string(),
            ))
            .into_response();
        }
    };

    match result.redirect_url() {
        Some(url) => {
            tracing::info!(
                session_id = result.data.as_ref().and_then(|d| d.session_id.as_deref()),
                "Redirecting to hosted checkout"
            );
            // HTMX swallows 3xx responses, so it gets the redirect as a
            // header instead.
            if headers.contains_key(HX_REQUEST) {
                match HeaderValue::from_str(url) {
                    Ok(value) => return ([(HX_REDIRECT, value)], "").into_response(),
                    Err(e) => {
                        tracing::error!(error = %e, "Checkout URL not header-safe");
                        return GetStartedTemplate::new(Some(
                            "Failed to create payment session".to_string(),
                        ))
                        .into_response();
                    }
                }
            }
            Redirect::to(url).into_response()
        }
        None => GetStartedTemplate::new(Some(result.message.unwrap_or_else(|| {
            "Failed to create payment session".to_string()
        })))
        .into_response(),
    }
}

/// Format whole dollars with thousands separators (5400 -> "5,400").
pub(crate) fn format_dollars(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn blank_form() -> RegisterForm {
        RegisterForm {
            full_name: String::new(),
            business_email: String::new(),
            phone_number: String::new(),
            company_name: String::new(),
            company_website: String::new(),
            business_address: String::new(),
            business_type: String::new(),
            referral_source: String::new(),
        }
    }

    #[test]
    fn test_validate_empty_full_name() {
        let mut form = blank_form();
        form.business_email = "a@b.co".to_string();

        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.full_name.as_deref(), Some("Full name is required"));
        assert!(errors.business_email.is_none());
    }

    #[test]
    fn test_validate_whitespace_name_is_empty() {
        let mut form = blank_form();
        form.full_name = "   ".to_string();
        form.business_email = "a@b.co".to_string();

        assert!(validate_registration(&form).is_err());
    }

    #[test]
    fn test_validate_malformed_email() {
        let mut form = blank_form();
        form.full_name = "Ada".to_string();
        form.business_email = "abc".to_string();

        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(
            errors.business_email.as_deref(),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_validate_missing_email() {
        let mut form = blank_form();
        form.full_name = "Ada".to_string();

        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.business_email.as_deref(), Some("Email is required"));
    }

    #[test]
    fn test_validate_success_trims_and_fills() {
        let mut form = blank_form();
        form.full_name = "  Ada Lovelace  ".to_string();
        form.business_email = "a@b.co".to_string();
        form.business_type = "SME".to_string();
        form.referral_source = "Conference/Event".to_string();
        form.company_name = " Analytical Engines ".to_string();

        let record = validate_registration(&form).unwrap();
        assert_eq!(record.full_name, "Ada Lovelace");
        assert_eq!(record.company_name, "Analytical Engines");
        assert_eq!(record.business_type, Some(BusinessType::Sme));
        assert_eq!(
            record.referral_source,
            Some(ReferralSource::ConferenceEvent)
        );
        assert!(record.client_id.as_str().starts_with("client_"));
    }

    #[test]
    fn test_build_deposit_request_guest_defaults() {
        let form = CheckoutForm {
            business_email: String::new(),
            full_name: String::new(),
            visitor_id: String::new(),
        };

        let request = build_deposit_request("https://brightlane.dev", &form);
        assert_eq!(request.amount, 135_000);
        assert_eq!(request.currency, "usd");
        assert_eq!(request.customer_email, GUEST_EMAIL);
        assert_eq!(request.customer_name.as_deref(), Some(GUEST_NAME));
        assert_eq!(
            request.success_url,
            "https://brightlane.dev/get-started/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            request.cancel_url,
            "https://brightlane.dev/get-started?step=payment"
        );
        assert_eq!(request.metadata.get("visitorId").unwrap(), "guest");
        assert_eq!(request.metadata.get("depositPercentage").unwrap(), "25");
    }

    #[test]
    fn test_build_deposit_request_visitor_fields() {
        let form = CheckoutForm {
            business_email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            visitor_id: "client_1_abc".to_string(),
        };

        let request = build_deposit_request("https://brightlane.dev", &form);
        assert_eq!(request.customer_email, "ada@example.com");
        assert_eq!(request.metadata.get("visitorId").unwrap(), "client_1_abc");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0), "0");
        assert_eq!(format_dollars(999), "999");
        assert_eq!(format_dollars(1350), "1,350");
        assert_eq!(format_dollars(5400), "5,400");
        assert_eq!(format_dollars(1_234_567), "1,234,567");
    }

    #[tokio::test]
    async fn test_registration_response_json_success() {
        let response = registration_response(
            200,
            true,
            r#"{"success":true,"message":"Welcome, Ada!"}"#,
        );
        let body = body_text(response).await;
        assert!(body.contains("Welcome, Ada!"));
        assert!(body.contains("Register again"));
    }

    #[tokio::test]
    async fn test_registration_response_non_json_2xx_is_success() {
        let response = registration_response(201, false, "created");
        let body = body_text(response).await;
        assert!(body.contains("created"));
    }

    #[tokio::test]
    async fn test_registration_response_conflict() {
        let response = registration_response(409, true, r#"{"success":false}"#);
        let body = body_text(response).await;
        assert!(body.contains("This email is already registered."));
    }

    #[tokio::test]
    async fn test_registration_response_server_error_ignores_body() {
        let response = registration_response(
            500,
            true,
            r#"{"success":false,"message":"stack trace"}"#,
        );
        let body = body_text(response).await;
        assert!(body.contains("Server error. Please try again later."));
        assert!(!body.contains("stack trace"));
    }

    #[tokio::test]
    async fn test_registration_response_unknown_status() {
        let response = registration_response(418, true, "{}");
        let body = body_text(response).await;
        assert!(body.contains("Error 418: Registration failed."));
    }

    #[tokio::test]
    async fn test_registration_response_json_success_false_is_error() {
        let response = registration_response(
            200,
            true,
            r#"{"success":false,"message":"Rejected"}"#,
        );
        let body = body_text(response).await;
        assert!(body.contains("Rejected"));
        assert!(!body.contains("Register again"));
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
