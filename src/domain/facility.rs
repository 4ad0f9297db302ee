//! Facility record returned to OpenHIM

use super::ids::SystemId;
use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the field the mediator adds to every record
pub const SYSTEM_ID_FIELD: &str = "systemID";

/// One DHIS2 organisation unit plus the mediator-generated `systemID`
///
/// Serializes as a flat JSON object: every upstream field, then `systemID`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityRecord {
    #[serde(flatten)]
    fields: Map<String, Value>,

    #[serde(rename = "systemID")]
    system_id: SystemId,
}

impl FacilityRecord {
    /// Stamps a fresh `systemID` onto the upstream fields
    ///
    /// An upstream-supplied `systemID` is replaced.
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(SYSTEM_ID_FIELD);
        Self {
            fields,
            system_id: SystemId::generate(),
        }
    }

    /// Upstream-supplied fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A single upstream field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The generated identifier
    pub fn system_id(&self) -> SystemId {
        self.system_id
    }
}
