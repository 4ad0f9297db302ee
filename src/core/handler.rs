//! Facility request pipeline
//!
//! `GET /facilities` runs config snapshot, DHIS2 fetch, transform and
//! envelope in that order, stopping at the first failure. Every outcome,
//! including failures, is rendered as a [`ResponseEnvelope`].

use crate::adapters::dhis::UpstreamClient;
use crate::core::envelope::ResponseEnvelope;
use crate::core::state::ConfigStore;
use crate::core::transform::FacilityTransformer;
use crate::domain::{MediatorUrn, TransformError, UpstreamError};
use crate::log_request_failure;
use serde_json::{json, Value};

/// Shown when the console has no complete `dhis` config
pub const MISSING_CONFIG_MESSAGE: &str = "Please add DHIS2 config via OpenHIM console";

/// Serves facility records from the currently configured DHIS2 instance
pub struct FacilityService {
    urn: MediatorUrn,
    store: ConfigStore,
    upstream: UpstreamClient,
    transformer: FacilityTransformer,
}

impl FacilityService {
    /// Create a service reading its upstream endpoint from `store`
    pub fn new(urn: MediatorUrn, store: ConfigStore, upstream: UpstreamClient) -> Self {
        Self {
            urn,
            store,
            upstream,
            transformer: FacilityTransformer::new(),
        }
    }

    /// URN stamped on every envelope
    pub fn urn(&self) -> &MediatorUrn {
        &self.urn
    }

    /// Handle one facilities request
    ///
    /// Never fails: every error is classified into a `Failed` envelope.
    ///
    /// | Outcome | Envelope status | HTTP status | Body |
    /// |---------|-----------------|-------------|------|
    /// | no complete `dhis` config | Failed | 400 | fixed message |
    /// | configured URL invalid | Failed | 400 | `{message, detail}` |
    /// | DHIS2 unreachable | Failed | 500 | `{message, detail}` |
    /// | DHIS2 status other than 200 | Failed | DHIS2 status | DHIS2 body |
    /// | XML unusable | Failed | 500 | `{message, detail}` |
    /// | success | Successful | 200 | facility records |
    pub async fn fetch_facilities(&self) -> ResponseEnvelope {
        // One snapshot for the whole request
        let config = self.store.snapshot();

        let Some(endpoint) = config.upstream() else {
            log_request_failure!(400, "Missing mediator config");
            return ResponseEnvelope::failed(
                &self.urn,
                400,
                json!({ "message": MISSING_CONFIG_MESSAGE }),
            );
        };

        let raw = match self.upstream.fetch(&endpoint).await {
            Ok(raw) => raw,
            Err(e) => return self.upstream_failure(e),
        };

        let records = match self.transformer.transform(&raw) {
            Ok(records) => records,
            Err(e) => return self.transform_failure(e),
        };

        match serde_json::to_value(&records) {
            Ok(body) => {
                tracing::info!(count = records.len(), "Served facilities");
                ResponseEnvelope::successful(&self.urn, 200, body)
            }
            Err(e) => {
                let detail = e.to_string();
                log_request_failure!(500, detail);
                ResponseEnvelope::failed(
                    &self.urn,
                    500,
                    error_body("Failed to serialize facility records", &detail),
                )
            }
        }
    }

    fn upstream_failure(&self, error: UpstreamError) -> ResponseEnvelope {
        let (status, body) = match &error {
            UpstreamError::InvalidUrl(detail) => {
                (400, error_body("Invalid DHIS2 config in OpenHIM console", detail))
            }
            UpstreamError::Transport(detail) => {
                (500, error_body("Failed to fetch facilities from DHIS2", detail))
            }
            UpstreamError::Status { code, body } => (*code, Value::String(body.clone())),
        };

        log_request_failure!(status, error);
        ResponseEnvelope::failed(&self.urn, status, body)
    }

    fn transform_failure(&self, error: TransformError) -> ResponseEnvelope {
        let body = match &error {
            TransformError::ParseFailure(detail) => {
                error_body("Failed to parse DHIS2 response", detail)
            }
            TransformError::UnexpectedStructure(detail) => {
                error_body("Unexpected data structure from DHIS2", detail)
            }
        };

        log_request_failure!(500, error);
        ResponseEnvelope::failed(&self.urn, 500, body)
    }
}

fn error_body(message: &str, detail: &str) -> Value {
    json!({ "message": message, "detail": detail })
}
