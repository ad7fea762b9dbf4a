use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Result, SifterError};

/// Sub-field suffix the engine's dynamic mapping gives exact companions of
/// free-text fields.
pub const KEYWORD_SUFFIX: &str = ".keyword";

/// Definition of a single field in an index mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Multi-fields, e.g. `keyword` under a `text` field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldMapping>,
    /// Children of an object field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, FieldMapping>,
}

impl FieldMapping {
    pub fn is_text(&self) -> bool {
        self.field_type.as_deref() == Some("text")
    }

    /// Name of an exact-match sub-field, preferring one called `keyword`.
    pub fn keyword_subfield(&self) -> Option<&str> {
        let is_keyword = |m: &FieldMapping| m.field_type.as_deref() == Some("keyword");
        if self.fields.get("keyword").is_some_and(is_keyword) {
            return Some("keyword");
        }
        self.fields
            .iter()
            .find(|(_, m)| is_keyword(*m))
            .map(|(name, _)| name.as_str())
    }
}

/// Field mappings of one index, as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexMapping {
    #[serde(default)]
    pub properties: BTreeMap<String, FieldMapping>,
}

impl IndexMapping {
    /// Parse a `GET /{index}/_mapping` response.
    ///
    /// The response is keyed by concrete index name, which differs from the
    /// requested name when an alias was used; a single entry is accepted
    /// under any key.
    pub fn from_response(index: &str, response: &Value) -> Result<Self> {
        let obj = response.as_object().ok_or_else(|| {
            SifterError::InvalidRequest(format!("Mapping response for {} is not an object", index))
        })?;

        let entry = match obj.get(index) {
            Some(entry) => entry,
            None => match obj.values().next() {
                Some(entry) if obj.len() == 1 => entry,
                _ => return Err(SifterError::IndexNotFound(index.to_string())),
            },
        };

        let mappings = entry.get("mappings").cloned().unwrap_or(Value::Null);
        if mappings.is_null() {
            return Ok(IndexMapping::default());
        }
        Ok(serde_json::from_value(mappings)?)
    }

    /// Look up a field by dotted path, descending through object properties
    /// and multi-fields.
    pub fn field(&self, path: &str) -> Option<&FieldMapping> {
        let mut parts = path.split('.');
        let mut current = self.properties.get(parts.next()?)?;
        for part in parts {
            current = current
                .properties
                .get(part)
                .or_else(|| current.fields.get(part))?;
        }
        Some(current)
    }
}
