use super::Classification;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Breakdown bucket for records without a single first-class type.
pub const OTHER_BUCKET: &str = "other";

pub type TagCounts = BTreeMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    ValidMarkers,
    InvalidMarkers,
    ValidValues,
    InvalidValues,
}

impl TagCategory {
    pub const ALL: [Self; 4] = [
        Self::ValidMarkers,
        Self::InvalidMarkers,
        Self::ValidValues,
        Self::InvalidValues,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidMarkers => "valid_markers",
            Self::InvalidMarkers => "invalid_markers",
            Self::ValidValues => "valid_values",
            Self::InvalidValues => "invalid_values",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ValidMarkers => "Valid markers",
            Self::InvalidMarkers => "Invalid markers",
            Self::ValidValues => "Valid values",
            Self::InvalidValues => "Invalid values",
        }
    }

    /// The tags of `classification` that fall in this category.
    #[must_use]
    pub fn tags_of(self, classification: &Classification) -> &[String] {
        match self {
            Self::ValidMarkers => &classification.valid_markers,
            Self::InvalidMarkers => &classification.invalid_markers,
            Self::ValidValues => &classification.valid_values,
            Self::InvalidValues => &classification.invalid_values,
        }
    }
}

/// Tag usage counts for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityBreakdown {
    pub valid_markers: TagCounts,
    pub invalid_markers: TagCounts,
    pub valid_values: TagCounts,
    pub invalid_values: TagCounts,
}

impl EntityBreakdown {
    #[must_use]
    pub fn get(&self, category: TagCategory) -> &TagCounts {
        match category {
            TagCategory::ValidMarkers => &self.valid_markers,
            TagCategory::InvalidMarkers => &self.invalid_markers,
            TagCategory::ValidValues => &self.valid_values,
            TagCategory::InvalidValues => &self.invalid_values,
        }
    }

    pub fn get_mut(&mut self, category: TagCategory) -> &mut TagCounts {
        match category {
            TagCategory::ValidMarkers => &mut self.valid_markers,
            TagCategory::InvalidMarkers => &mut self.invalid_markers,
            TagCategory::ValidValues => &mut self.valid_values,
            TagCategory::InvalidValues => &mut self.invalid_values,
        }
    }

    /// Count one record's usage of every tag it carries.
    pub fn record(&mut self, classification: &Classification) {
        for category in TagCategory::ALL {
            let counts = self.get_mut(category);
            for tag in category.tags_of(classification) {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub valid: usize,
    pub no_fc_entity: usize,
    pub mult_fc_entities: usize,
    /// Records without an `id`; already included in `no_fc_entity`.
    pub missing_id: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildingReport {
    pub name: String,
    pub summary: ReportSummary,
    pub valid_markers: BTreeSet<String>,
    pub invalid_markers: BTreeSet<String>,
    pub valid_values: BTreeSet<String>,
    pub invalid_values: BTreeSet<String>,
    pub breakdown: BTreeMap<String, EntityBreakdown>, // entity type → category → tag → count
    pub entities: Vec<Classification>,
}

impl BuildingReport {
    /// Entity types present in the breakdown, `other` last.
    #[must_use]
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .breakdown
            .keys()
            .map(String::as_str)
            .filter(|t| *t != OTHER_BUCKET)
            .collect();
        if self.breakdown.contains_key(OTHER_BUCKET) {
            types.push(OTHER_BUCKET);
        }
        types
    }

    #[must_use]
    pub fn counts(&self, entity_type: &str, category: TagCategory) -> Option<&TagCounts> {
        self.breakdown.get(entity_type).map(|b| b.get(category))
    }

    /// Number of records classified into `entity_type`.
    #[must_use]
    pub fn records_of_type(&self, entity_type: &str) -> usize {
        self.entities
            .iter()
            .filter(|c| c.bucket() == entity_type)
            .count()
    }
}
