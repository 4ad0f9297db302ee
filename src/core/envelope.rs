//! OpenHIM mediator response envelope
//!
//! OpenHIM records every mediator response as a JSON envelope carrying the
//! mediator URN, an overall status, and the response the channel client
//! should see.

use crate::domain::MediatorUrn;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

/// Last timestamp handed out, so timestamps never go backwards
static LAST_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Overall transaction status reported to OpenHIM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnvelopeStatus {
    Successful,
    Failed,
}

/// Fixed response headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeHeaders {
    #[serde(rename = "content-type")]
    pub content_type: String,
}

impl Default for EnvelopeHeaders {
    fn default() -> Self {
        Self {
            content_type: "application/json".to_string(),
        }
    }
}

/// The response OpenHIM relays to the channel client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeResponse {
    /// HTTP status
    pub status: u16,

    pub headers: EnvelopeHeaders,

    pub body: Value,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Free-form properties shown on the transaction in the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeProperties {
    pub property: String,
}

impl Default for EnvelopeProperties {
    fn default() -> Self {
        Self {
            property: "Primary Route".to_string(),
        }
    }
}

/// The complete mediator response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "x-mediator-urn")]
    pub urn: MediatorUrn,

    pub status: EnvelopeStatus,

    pub response: EnvelopeResponse,

    pub properties: EnvelopeProperties,
}

impl ResponseEnvelope {
    /// Builds an envelope stamped with the current time
    ///
    /// Never fails. The timestamp is non-decreasing across calls in this
    /// process even if the wall clock steps backwards.
    pub fn build(urn: &MediatorUrn, status: EnvelopeStatus, http_status: u16, body: Value) -> Self {
        Self {
            urn: urn.clone(),
            status,
            response: EnvelopeResponse {
                status: http_status,
                headers: EnvelopeHeaders::default(),
                body,
                timestamp: next_timestamp(),
            },
            properties: EnvelopeProperties::default(),
        }
    }

    /// Shorthand for a `Successful` envelope
    pub fn successful(urn: &MediatorUrn, http_status: u16, body: Value) -> Self {
        Self::build(urn, EnvelopeStatus::Successful, http_status, body)
    }

    /// Shorthand for a `Failed` envelope
    pub fn failed(urn: &MediatorUrn, http_status: u16, body: Value) -> Self {
        Self::build(urn, EnvelopeStatus::Failed, http_status, body)
    }

    /// Whether the envelope reports success
    pub fn is_successful(&self) -> bool {
        self.status == EnvelopeStatus::Successful
    }
}

fn next_timestamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_TIMESTAMP_MS.fetch_max(now, Ordering::SeqCst);
    previous.max(now)
}
