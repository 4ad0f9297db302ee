//! DHIS2 organisation unit transformation
//!
//! Turns a DHIS2 metadata export into facility records. The expected shape is
//!
//! ```xml
//! <metadata>
//!   <organisationUnits>
//!     <organisationUnit id="..." name="..."/>
//!     ...
//!   </organisationUnits>
//! </metadata>
//! ```
//!
//! Parsing and shape validation are separate steps so callers can tell a
//! broken document ([`TransformError::ParseFailure`]) from one that is valid
//! XML but not an organisation unit export
//! ([`TransformError::UnexpectedStructure`]).

pub mod xml;

use crate::domain::{FacilityRecord, TransformError};
use roxmltree::{Document, Node};
use serde_json::{Map, Value};

const METADATA: &str = "metadata";
const ORGANISATION_UNITS: &str = "organisationUnits";
const ORGANISATION_UNIT: &str = "organisationUnit";

/// Converts DHIS2 metadata XML into facility records
#[derive(Debug, Clone, Copy, Default)]
pub struct FacilityTransformer;

impl FacilityTransformer {
    /// Create a new transformer
    pub fn new() -> Self {
        Self
    }

    /// Parses `raw_xml` and stamps each organisation unit with a `systemID`
    ///
    /// Record order follows document order, and every upstream field is kept.
    /// A single organisation unit yields a one-element vector.
    ///
    /// # Errors
    ///
    /// - [`TransformError::UnexpectedStructure`] if the body is empty or the
    ///   `metadata/organisationUnits/organisationUnit` path is absent
    /// - [`TransformError::ParseFailure`] if the body is not well-formed XML
    ///
    /// # Examples
    ///
    /// ```
    /// use dhis_mediator::core::transform::FacilityTransformer;
    ///
    /// let xml = r#"<metadata><organisationUnits>
    ///     <organisationUnit id="1" name="Clinic"/>
    /// </organisationUnits></metadata>"#;
    ///
    /// let records = FacilityTransformer::new().transform(xml).unwrap();
    /// assert_eq!(records.len(), 1);
    /// assert_eq!(records[0].get("id").unwrap(), "1");
    /// ```
    pub fn transform(&self, raw_xml: &str) -> Result<Vec<FacilityRecord>, TransformError> {
        if raw_xml.trim().is_empty() {
            return Err(TransformError::UnexpectedStructure(
                "empty response body".to_string(),
            ));
        }

        let doc = Document::parse(raw_xml)
            .map_err(|e| TransformError::ParseFailure(e.to_string()))?;

        tracing::debug!("Received XML data from DHIS2");

        let units = organisation_units(doc.root_element())?;

        let records: Vec<FacilityRecord> = units
            .into_iter()
            .map(|unit| FacilityRecord::new(unit_fields(unit)))
            .collect();

        tracing::debug!(
            count = records.len(),
            "Added systemID to each organisation unit"
        );

        Ok(records)
    }
}

/// Validates the document shape and returns the organisation unit elements
fn organisation_units<'a, 'input>(
    root: Node<'a, 'input>,
) -> Result<Vec<Node<'a, 'input>>, TransformError> {
    if root.tag_name().name() != METADATA {
        return Err(TransformError::UnexpectedStructure(format!(
            "expected root element <{METADATA}>, found <{}>",
            root.tag_name().name()
        )));
    }

    let container = child_elements(root, ORGANISATION_UNITS)
        .next()
        .ok_or_else(|| {
            TransformError::UnexpectedStructure(format!(
                "<{METADATA}> has no <{ORGANISATION_UNITS}> element"
            ))
        })?;

    let units: Vec<Node<'a, 'input>> = child_elements(container, ORGANISATION_UNIT).collect();
    if units.is_empty() {
        return Err(TransformError::UnexpectedStructure(format!(
            "<{ORGANISATION_UNITS}> has no <{ORGANISATION_UNIT}> elements"
        )));
    }

    Ok(units)
}

fn child_elements<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn unit_fields(unit: Node<'_, '_>) -> Map<String, Value> {
    match xml::element_to_value(unit) {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert(xml::TEXT_KEY.to_string(), other);
            map
        }
    }
}
