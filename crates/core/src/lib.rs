//! Brightlane Core - Shared types library.
//!
//! This crate provides the domain types used across the Brightlane
//! components:
//! - `site` - The public marketing site and get-started funnel
//! - `integration-tests` - HTTP-level tests against the site
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! here is transient data that either travels over the wire to the upstream
//! payment/visitor services or backs a rendered page.
//!
//! # Modules
//!
//! - [`types`] - Validated emails, money arithmetic, generated client IDs,
//!   visitor records, and the checkout/webhook wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
