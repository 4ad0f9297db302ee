//! Operator-managed mediator configuration
//!
//! This is the configuration an operator edits in the OpenHIM console. It is
//! delivered as an opaque JSON object on the initial fetch and on heartbeats,
//! so parsing here never fails: a snapshot whose `dhis` section is missing or
//! malformed simply has no upstream endpoint, and the request handler reports
//! that at request time.

use serde::Deserialize;
use serde_json::Value;

/// One complete configuration snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct MediatorConfig {
    raw: Value,
    dhis: Option<DhisSettings>,
}

/// The `dhis` section as entered in the console
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DhisSettings {
    /// DHIS2 base URL
    #[serde(default)]
    pub url: Option<String>,

    /// Path resolved against `url`
    #[serde(default)]
    pub path: Option<String>,
}

/// A complete `{url, path}` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoint {
    /// DHIS2 base URL
    pub url: String,
    /// Path resolved against the base URL
    pub path: String,
}

impl UpstreamEndpoint {
    /// Creates an endpoint from a url/path pair
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }
}

impl MediatorConfig {
    /// The configuration a freshly started mediator holds before the first fetch
    pub fn empty() -> Self {
        Self {
            raw: Value::Object(serde_json::Map::new()),
            dhis: None,
        }
    }

    /// Builds a snapshot from the JSON object OpenHIM delivered
    ///
    /// `null` is treated as an empty configuration.
    pub fn from_value(raw: Value) -> Self {
        let raw = if raw.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            raw
        };

        let dhis = raw
            .get("dhis")
            .cloned()
            .and_then(|section| serde_json::from_value::<DhisSettings>(section).ok());

        Self { raw, dhis }
    }

    /// The `dhis` section, if present and well-typed
    pub fn dhis(&self) -> Option<&DhisSettings> {
        self.dhis.as_ref()
    }

    /// The upstream endpoint, only when both `url` and `path` are non-empty
    pub fn upstream(&self) -> Option<UpstreamEndpoint> {
        let dhis = self.dhis.as_ref()?;
        let url = dhis.url.as_deref().filter(|s| !s.trim().is_empty())?;
        let path = dhis.path.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(UpstreamEndpoint::new(url, path))
    }

    /// The snapshot exactly as delivered
    pub fn as_value(&self) -> &Value {
        &self.raw
    }
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self::empty()
    }
}
