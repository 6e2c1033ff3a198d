//! Flat Haystack records and the tags the rest of the crate looks up by name.

use serde_json::{Map, Value};

/// One building entity: tag name to tag value, as found in a grid row.
pub type Record = Map<String, Value>;

/// Canonical JSON encoding of a marker value.
pub const MARKER: &str = "m:";

/// Legacy marker encoding seen in real-world extracts.
pub const LEGACY_MARKER: &str = "M";

pub const ID_TAG: &str = "id";
pub const DIS_TAG: &str = "dis";
pub const NAV_NAME_TAG: &str = "navName";
pub const EQUIP_REF_TAG: &str = "equipRef";

#[must_use]
pub fn marker() -> Value {
    Value::String(MARKER.to_string())
}

#[must_use]
pub fn is_marker(value: &Value) -> bool {
    value.as_str() == Some(MARKER)
}

/// The record's `id`, rendered as text. Refs stay in their `r:` encoding.
#[must_use]
pub fn record_id(record: &Record) -> Option<String> {
    record.get(ID_TAG).map(render_value)
}

#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
