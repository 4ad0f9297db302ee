//! OpenHIM core API client
//!
//! Implements [`SwitchApi`] against the OpenHIM REST API:
//!
//! - `POST /mediators` registers the mediator (201 expected)
//! - `GET /mediators/{urn}` returns the persisted config (200 expected)
//! - `POST /mediators/{urn}/heartbeat` reports uptime and may return config (200 expected)
//!
//! Every call is preceded by the salt handshake in [`super::auth`].

use super::auth::{AuthChallenge, AuthHeaders};
use super::SwitchApi;
use crate::config::{OpenHimConfig, SecretString};
use crate::domain::{
    MediatorConfig, MediatorError, MediatorIdentity, MediatorUrn, Result, SwitchError,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// OpenHIM API client
pub struct OpenHimClient {
    /// Base URL of the OpenHIM API
    api_url: Url,

    /// HTTP client for making requests
    client: Client,

    /// API user
    username: String,

    /// API user password
    password: SecretString,
}

impl OpenHimClient {
    /// Create a new OpenHIM client
    ///
    /// When `trust_self_signed` is set, certificate verification is disabled
    /// for every call this client makes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `api_url` is not a valid base URL or
    /// the HTTP client cannot be built.
    pub fn new(config: &OpenHimConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| {
            MediatorError::Configuration(format!(
                "Invalid openhim.api_url '{}': {e}",
                config.api_url
            ))
        })?;

        if api_url.cannot_be_a_base() {
            return Err(MediatorError::Configuration(format!(
                "openhim.api_url '{}' cannot be used as a base URL",
                config.api_url
            )));
        }

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10));

        if config.trust_self_signed {
            tracing::warn!(
                api_url = %config.api_url,
                "Self-signed certificate trust enabled, TLS verification disabled for OpenHIM API"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            MediatorError::Configuration(format!("Failed to build OpenHIM HTTP client: {e}"))
        })?;

        Ok(Self {
            api_url,
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Joins path segments onto the API base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                MediatorError::Configuration(format!(
                    "openhim.api_url '{}' cannot be used as a base URL",
                    self.api_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs the salt handshake and derives request headers
    async fn authenticate(&self) -> Result<AuthHeaders> {
        let url = self.endpoint(&["authenticate", &self.username])?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SwitchError::ConnectionFailed(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            let status = resp.status();
            let body = crate::adapters::error_body_text(resp).await;
            return Err(SwitchError::AuthenticationFailed(format!(
                "User {} not authenticated, status {status}: {body}",
                self.username
            ))
            .into());
        }

        let challenge: AuthChallenge = resp
            .json()
            .await
            .map_err(|e| SwitchError::AuthenticationFailed(e.to_string()))?;

        Ok(AuthHeaders::new(
            &self.username,
            self.password.expose_secret().as_ref(),
            &challenge,
            Utc::now().to_rfc3339(),
        ))
    }
}

#[async_trait]
impl SwitchApi for OpenHimClient {
    async fn register(&self, identity: &MediatorIdentity) -> Result<()> {
        let headers = self.authenticate().await?;
        let url = self.endpoint(&["mediators"])?;

        tracing::debug!(urn = %identity.urn(), url = %url, "Registering mediator");

        let resp = headers
            .apply(self.client.post(url))
            .json(identity.document())
            .send()
            .await
            .map_err(|e| SwitchError::ConnectionFailed(e.to_string()))?;

        match resp.status() {
            StatusCode::CREATED => Ok(()),
            status => {
                let body = crate::adapters::error_body_text(resp).await;
                Err(SwitchError::RegistrationRejected {
                    status: status.as_u16(),
                    body,
                }
                .into())
            }
        }
    }

    async fn fetch_config(&self, urn: &MediatorUrn) -> Result<MediatorConfig> {
        let headers = self.authenticate().await?;
        let url = self.endpoint(&["mediators", urn.as_str()])?;

        let resp = headers
            .apply(self.client.get(url))
            .send()
            .await
            .map_err(|e| SwitchError::ConnectionFailed(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            let status = resp.status();
            let body = crate::adapters::error_body_text(resp).await;
            return Err(SwitchError::ConfigFetchFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let mediator: Value = resp
            .json()
            .await
            .map_err(|e| SwitchError::InvalidResponse(e.to_string()))?;

        let config = mediator.get("config").cloned().unwrap_or(Value::Null);
        Ok(MediatorConfig::from_value(config))
    }

    async fn heartbeat(
        &self,
        urn: &MediatorUrn,
        uptime: Duration,
        force_config: bool,
    ) -> Result<Option<MediatorConfig>> {
        let headers = self.authenticate().await?;
        let url = self.endpoint(&["mediators", urn.as_str(), "heartbeat"])?;

        let mut body = serde_json::json!({ "uptime": uptime.as_secs_f64() });
        if force_config {
            body["config"] = Value::Bool(true);
        }

        let resp = headers
            .apply(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SwitchError::ConnectionFailed(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(SwitchError::HeartbeatRejected {
                status: resp.status().as_u16(),
            }
            .into());
        }

        let text = resp
            .text()
            .await
            .map_err(|e| SwitchError::InvalidResponse(e.to_string()))?;
        parse_heartbeat_body(&text)
    }

    fn api_url(&self) -> &str {
        self.api_url.as_str()
    }
}

/// Interprets a successful heartbeat body
///
/// OpenHIM answers with an empty body (or `OK`) when there is nothing new, and
/// with the config object otherwise. An empty object is a config that has
/// been cleared in the console and replaces the current one.
fn parse_heartbeat_body(text: &str) -> Result<Option<MediatorConfig>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "OK" {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| SwitchError::InvalidResponse(format!("heartbeat body: {e}")))?;

    match value {
        Value::Object(_) => Ok(Some(MediatorConfig::from_value(value))),
        Value::Null => Ok(None),
        other => Err(SwitchError::InvalidResponse(format!(
            "heartbeat body is not an object: {other}"
        ))
        .into()),
    }
}
