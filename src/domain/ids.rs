//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers the mediator hands out or receives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Mediator URN newtype wrapper
///
/// Identifies this mediator to OpenHIM on registration, config fetch and
/// heartbeat, and is echoed in every response envelope.
///
/// # Examples
///
/// ```
/// use dhis_mediator::domain::ids::MediatorUrn;
/// use std::str::FromStr;
///
/// let urn = MediatorUrn::from_str("urn:mediator:dhis2-facilities").unwrap();
/// assert_eq!(urn.as_str(), "urn:mediator:dhis2-facilities");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediatorUrn(String);

impl MediatorUrn {
    /// Creates a new MediatorUrn from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(MediatorUrn)` if the value is a non-empty `urn:` string, `Err` otherwise
    pub fn new(urn: impl Into<String>) -> Result<Self, String> {
        let urn = urn.into();
        if urn.trim().is_empty() {
            return Err("Mediator URN cannot be empty".to_string());
        }
        if !urn.starts_with("urn:") {
            return Err(format!("Mediator URN must start with 'urn:', got '{urn}'"));
        }
        Ok(Self(urn))
    }

    /// Returns the URN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediatorUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MediatorUrn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MediatorUrn {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MediatorUrn> for String {
    fn from(urn: MediatorUrn) -> Self {
        urn.0
    }
}

impl AsRef<str> for MediatorUrn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier the mediator stamps onto every facility record it returns
///
/// Always a random (v4) UUID; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(Uuid);

impl SystemId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
