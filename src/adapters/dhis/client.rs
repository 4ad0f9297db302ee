//! DHIS2 HTTP client

use crate::config::UpstreamConfig;
use crate::domain::{MediatorError, Result, UpstreamEndpoint, UpstreamError};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use url::Url;

/// HTTP client for DHIS2 metadata requests
///
/// Holds only the connection pool; the endpoint is passed per call so a
/// configuration change takes effect on the next request.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Create a new DHIS2 client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                MediatorError::Configuration(format!("Failed to build DHIS2 HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Resolves `path` against the base `url`
    ///
    /// Standard relative resolution applies: with a base of
    /// `https://host/2.30/`, the path `api/metadata.xml` resolves to
    /// `https://host/2.30/api/metadata.xml`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] if either part is malformed.
    pub fn resolve(endpoint: &UpstreamEndpoint) -> std::result::Result<Url, UpstreamError> {
        let base = Url::parse(endpoint.url.trim()).map_err(|e| {
            UpstreamError::InvalidUrl(format!("{}: {e}", endpoint.url))
        })?;
        base.join(endpoint.path.trim()).map_err(|e| {
            UpstreamError::InvalidUrl(format!("{}{}: {e}", endpoint.url, endpoint.path))
        })
    }

    /// Fetches the raw body from the configured endpoint
    ///
    /// Performs a single GET with no retries.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::InvalidUrl`] if the endpoint does not resolve
    /// - [`UpstreamError::Transport`] if no response was received
    /// - [`UpstreamError::Status`] if the response status is not 200
    pub async fn fetch(
        &self,
        endpoint: &UpstreamEndpoint,
    ) -> std::result::Result<String, UpstreamError> {
        let url = Self::resolve(endpoint)?;

        tracing::debug!(url = %url, "Fetching DHIS2 metadata");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = crate::adapters::error_body_text(resp).await;
            tracing::debug!(url = %url, status = status.as_u16(), "DHIS2 returned non-success status");
            return Err(UpstreamError::Status {
                code: status.as_u16(),
                body,
            });
        }

        resp.text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))
    }
}
