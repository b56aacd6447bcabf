//! JSON API routes.
//!
//! Everything under `/api` is a thin relay to the upstream payment and
//! visitor services, plus the webhook ingress. None of these handlers hold
//! state or retry; they forward once and hand back whatever came back.

pub mod payment;
pub mod visitors;
