use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Why a record could not be given a first-class entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TypingFailure {
    MissingId,
    NoEntityType,
    MultipleEntityTypes { found: BTreeSet<String> },
}

impl fmt::Display for TypingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("missing identifier"),
            Self::NoEntityType => f.write_str("no first-class entity type provided"),
            Self::MultipleEntityTypes { found } => {
                let found: Vec<&str> = found.iter().map(String::as_str).collect();
                write!(
                    f,
                    "multiple first-class entity types provided: {}",
                    found.join(", ")
                )
            }
        }
    }
}

/// Type-specific facets of a valid entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subtypes {
    Equip {
        /// Registered equip subclasses (simple or compound) the markers spell out.
        subclasses_in_entity: Vec<String>,
        non_entity_markers: Vec<String>,
    },
    Point {
        point_functions: Vec<String>,
        phenomena: Vec<String>,
        quantities: Vec<String>,
    },
}

/// Result of typing a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub id: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TypingFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fc_entity_type: Option<String>,
    pub valid_markers: Vec<String>,
    pub invalid_markers: Vec<String>,
    pub valid_values: Vec<String>,
    pub invalid_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Subtypes>,
}

impl Classification {
    #[must_use]
    pub fn missing_id() -> Self {
        Self::failed(None, TypingFailure::MissingId)
    }

    #[must_use]
    pub fn failed(id: Option<String>, failure: TypingFailure) -> Self {
        Self {
            id,
            valid: false,
            description: Some(failure.to_string()),
            failure: Some(failure),
            fc_entity_type: None,
            valid_markers: Vec::new(),
            invalid_markers: Vec::new(),
            valid_values: Vec::new(),
            invalid_values: Vec::new(),
            subtypes: None,
        }
    }

    #[must_use]
    pub fn typed(id: String, fc_entity_type: String) -> Self {
        Self {
            id: Some(id),
            valid: true,
            failure: None,
            description: None,
            fc_entity_type: Some(fc_entity_type),
            valid_markers: Vec::new(),
            invalid_markers: Vec::new(),
            valid_values: Vec::new(),
            invalid_values: Vec::new(),
            subtypes: None,
        }
    }

    /// Breakdown bucket: the first-class type, or `other` for untyped records.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.fc_entity_type
            .as_deref()
            .unwrap_or(super::report::OTHER_BUCKET)
    }
}
