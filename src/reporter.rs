//! Building-wide aggregation of per-record typing results.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::model::{BuildingReport, Classification, EntityBreakdown, Record, ReportSummary, TypingFailure};
use crate::ontology::OntologyIndex;
use crate::tags::{only_markers_in, only_values_in};
use crate::typer::{classify_all, split_markers, split_values};

/// Type every record and aggregate the results into one report.
#[must_use]
pub fn report(name: &str, records: &[Record], ontology: &OntologyIndex) -> BuildingReport {
    let entities = classify_all(records, ontology);

    let markers: BTreeSet<String> = only_markers_in(records).into_iter().collect();
    let values: BTreeSet<String> = only_values_in(records).into_iter().collect();
    let (valid_markers, invalid_markers) = split_markers(&markers, ontology);
    let (valid_values, invalid_values) = split_values(&values, ontology);

    let report = BuildingReport {
        name: name.to_string(),
        summary: summarize(&entities),
        valid_markers,
        invalid_markers,
        valid_values,
        invalid_values,
        breakdown: breakdown(&entities),
        entities,
    };

    info!(
        building = name,
        total = report.summary.total,
        valid = report.summary.valid,
        no_fc_entity = report.summary.no_fc_entity,
        mult_fc_entities = report.summary.mult_fc_entities,
        missing_id = report.summary.missing_id,
        "building report built"
    );
    report
}

/// Count valid records and each kind of typing failure.
#[must_use]
pub fn summarize(entities: &[Classification]) -> ReportSummary {
    let mut summary = ReportSummary {
        total: entities.len(),
        ..ReportSummary::default()
    };

    for entity in entities {
        match &entity.failure {
            None => summary.valid += 1,
            Some(TypingFailure::NoEntityType) => summary.no_fc_entity += 1,
            Some(TypingFailure::MultipleEntityTypes { .. }) => summary.mult_fc_entities += 1,
            // No first-class type was determined either
            Some(TypingFailure::MissingId) => {
                summary.no_fc_entity += 1;
                summary.missing_id += 1;
            }
        }
    }
    summary
}

/// Entity type → tag category → tag → number of records carrying it.
#[must_use]
pub fn breakdown(entities: &[Classification]) -> BTreeMap<String, EntityBreakdown> {
    let mut out: BTreeMap<String, EntityBreakdown> = BTreeMap::new();
    for entity in entities {
        out.entry(entity.bucket().to_string())
            .or_default()
            .record(entity);
    }
    out
}
