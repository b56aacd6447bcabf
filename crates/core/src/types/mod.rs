//! Core types for Brightlane.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod checkout;
pub mod email;
pub mod id;
pub mod money;
pub mod visitor;
pub mod webhook;

pub use checkout::{CheckoutRequest, CheckoutSessionData, CheckoutSessionResponse};
pub use email::{Email, EmailError};
pub use id::ClientId;
pub use money::ProjectEstimate;
pub use visitor::{BusinessType, ReferralSource, VisitorRecord, VisitorStatus};
pub use webhook::{
    CHECKOUT_SESSION_COMPLETED, PAYMENT_INTENT_FAILED, WebhookAck, WebhookEvent,
};
