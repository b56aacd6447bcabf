//! Visitor records captured by the registration form.
//!
//! These records travel to the upstream visitor service as camelCase JSON
//! and are never persisted locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ClientId, Email};

/// A registration payload for the upstream visitor service.
///
/// Only `full_name` and `business_email` are validated; everything else is
/// optional free text the form passes through as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub full_name: String,
    pub business_email: Email,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_website: String,
    #[serde(default)]
    pub business_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<BusinessType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_source: Option<ReferralSource>,
    pub timestamp: DateTime<Utc>,
    pub client_id: ClientId,
}

/// What best describes the visitor's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    Startup,
    #[serde(rename = "SME")]
    Sme,
    Nonprofit,
    Enterprise,
    Government,
    Freelancer,
    Other,
}

impl BusinessType {
    /// All options, in the order the form presents them.
    pub const ALL: [Self; 7] = [
        Self::Startup,
        Self::Sme,
        Self::Nonprofit,
        Self::Enterprise,
        Self::Government,
        Self::Freelancer,
        Self::Other,
    ];

    /// The user-facing label, which is also the wire value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "Startup",
            Self::Sme => "SME",
            Self::Nonprofit => "Nonprofit",
            Self::Enterprise => "Enterprise",
            Self::Government => "Government",
            Self::Freelancer => "Freelancer",
            Self::Other => "Other",
        }
    }

    /// Parse a form select value. Unknown or empty values become `None`.
    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == s)
    }
}

/// How the visitor heard about us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferralSource {
    Google,
    #[serde(rename = "Social Media")]
    SocialMedia,
    Referral,
    Email,
    Advertisement,
    #[serde(rename = "Conference/Event")]
    ConferenceEvent,
    Other,
}

impl ReferralSource {
    /// All options, in the order the form presents them.
    pub const ALL: [Self; 7] = [
        Self::Google,
        Self::SocialMedia,
        Self::Referral,
        Self::Email,
        Self::Advertisement,
        Self::ConferenceEvent,
        Self::Other,
    ];

    /// The user-facing label, which is also the wire value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::SocialMedia => "Social Media",
            Self::Referral => "Referral",
            Self::Email => "Email",
            Self::Advertisement => "Advertisement",
            Self::ConferenceEvent => "Conference/Event",
            Self::Other => "Other",
        }
    }

    /// Parse a form select value. Unknown or empty values become `None`.
    #[must_use]
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == s)
    }
}

/// Where a visitor sits in the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitorStatus {
    /// Registered but has not paid.
    #[default]
    Visitor,
    /// Paid the deposit and moved to the client dashboard.
    Client,
}

impl VisitorStatus {
    /// The wire value, which is also the user-facing label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Client => "client",
        }
    }
}
