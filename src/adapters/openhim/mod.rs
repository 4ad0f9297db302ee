//! OpenHIM adapter implementation
//!
//! This module provides the integration with the OpenHIM core API: the
//! [`SwitchApi`] trait the lifecycle depends on, the token authentication
//! handshake, and the HTTP client implementing the trait.

pub mod auth;
pub mod client;
mod switch;

pub use auth::{AuthChallenge, AuthHeaders};
pub use client::OpenHimClient;
pub use switch::SwitchApi;
