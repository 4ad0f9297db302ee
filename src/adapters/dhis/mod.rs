//! DHIS2 adapter implementation
//!
//! Fetches organisation unit metadata from a DHIS2 instance. The endpoint is
//! not known at startup; it comes from the operator-managed
//! [`MediatorConfig`](crate::domain::MediatorConfig) on every request.

pub mod client;

pub use client::UpstreamClient;
