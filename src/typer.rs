//! Entity typing: validate a record's tags against the ontology and resolve
//! its first-class type and subtype facets.
//!
//! Typing never fails. Every anomaly ends up in the returned
//! [`Classification`] so a batch report can always run to completion.

use std::collections::BTreeSet;

use tracing::debug;

use crate::model::record::record_id;
use crate::model::{Classification, Record, Subtypes, TypingFailure};
use crate::ontology::{OntologyIndex, OntologyRoot};
use crate::tags::{only_markers, only_values};

/// Type a single record.
///
/// 1. Records without an `id` stop here as [`TypingFailure::MissingId`].
/// 2. Markers and values are split into valid/invalid against the
///    `marker` and `val` closures.
/// 3. Exactly one marker must be a first-class entity (a direct child of
///    `entity`); zero or several make the record invalid.
/// 4. Valid equips and points get their subtype facets resolved.
#[must_use]
pub fn classify(record: &Record, ontology: &OntologyIndex) -> Classification {
    let Some(id) = record_id(record) else {
        return Classification::missing_id();
    };

    let markers: BTreeSet<String> = only_markers(record).into_iter().collect();
    let values: BTreeSet<String> = only_values(record).into_iter().collect();

    let (valid_markers, invalid_markers) = split_markers(&markers, ontology);
    let (valid_values, invalid_values) = split_values(&values, ontology);

    let candidates: BTreeSet<String> = markers
        .intersection(ontology.first_class_entities())
        .cloned()
        .collect();

    let mut result = match candidates.len() {
        0 => Classification::failed(Some(id), TypingFailure::NoEntityType),
        1 => {
            let fc_type = candidates.into_iter().next().unwrap_or_default();
            let non_entity: BTreeSet<String> = valid_markers
                .difference(ontology.closure_of(OntologyRoot::Entity))
                .cloned()
                .collect();
            let subtypes = resolve_subtypes(&fc_type, &markers, &non_entity, ontology);

            let mut typed = Classification::typed(id, fc_type);
            typed.subtypes = subtypes;
            typed
        }
        _ => Classification::failed(
            Some(id),
            TypingFailure::MultipleEntityTypes { found: candidates },
        ),
    };

    result.valid_markers = valid_markers.into_iter().collect();
    result.invalid_markers = invalid_markers.into_iter().collect();
    result.valid_values = valid_values.into_iter().collect();
    result.invalid_values = invalid_values.into_iter().collect();

    debug!(
        id = result.id.as_deref().unwrap_or_default(),
        valid = result.valid,
        entity_type = result.bucket(),
        "typed record"
    );
    result
}

/// Type every record, in order.
#[must_use]
pub fn classify_all(records: &[Record], ontology: &OntologyIndex) -> Vec<Classification> {
    records.iter().map(|r| classify(r, ontology)).collect()
}

/// `(valid, invalid)` markers against the `marker` closure.
#[must_use]
pub fn split_markers(
    markers: &BTreeSet<String>,
    ontology: &OntologyIndex,
) -> (BTreeSet<String>, BTreeSet<String>) {
    split(markers, ontology.closure_of(OntologyRoot::Marker))
}

/// `(valid, invalid)` value tags against the `val` closure.
///
/// Only checked when there is more than one value tag; a lone value tag is
/// reported in neither set.
// TODO: decide whether a lone value tag should be validated as well; reports
// currently never flag it.
#[must_use]
pub fn split_values(
    values: &BTreeSet<String>,
    ontology: &OntologyIndex,
) -> (BTreeSet<String>, BTreeSet<String>) {
    if values.len() > 1 {
        split(values, ontology.closure_of(OntologyRoot::Val))
    } else {
        (BTreeSet::new(), BTreeSet::new())
    }
}

fn split(
    tags: &BTreeSet<String>,
    closure: &BTreeSet<String>,
) -> (BTreeSet<String>, BTreeSet<String>) {
    tags.iter().cloned().partition(|tag| closure.contains(tag))
}

fn resolve_subtypes(
    fc_type: &str,
    markers: &BTreeSet<String>,
    non_entity: &BTreeSet<String>,
    ontology: &OntologyIndex,
) -> Option<Subtypes> {
    match fc_type {
        "equip" => Some(equip_subtypes(markers, non_entity, ontology)),
        "point" => Some(point_subtypes(non_entity, ontology)),
        _ => None,
    }
}

fn equip_subtypes(
    markers: &BTreeSet<String>,
    non_entity: &BTreeSet<String>,
    ontology: &OntologyIndex,
) -> Subtypes {
    let available: BTreeSet<&str> = markers
        .iter()
        .chain(non_entity)
        .map(String::as_str)
        .collect();

    let mut subclasses = BTreeSet::new();
    for components in ontology.equipment_component_sets() {
        if !components.iter().all(|c| available.contains(c.as_str())) {
            continue;
        }
        let tokens: Vec<&str> = components.iter().map(String::as_str).collect();
        if tokens.len() == 1 {
            subclasses.insert(tokens[0].to_string());
            continue;
        }
        // The registered name may use any ordering of its components
        for order in permutations(&tokens) {
            let name = order.join("-");
            if ontology.is_equip_class(&name) {
                subclasses.insert(name);
            }
        }
    }

    Subtypes::Equip {
        subclasses_in_entity: subclasses.into_iter().collect(),
        non_entity_markers: non_entity.iter().cloned().collect(),
    }
}

fn point_subtypes(non_entity: &BTreeSet<String>, ontology: &OntologyIndex) -> Subtypes {
    let facet = |set: &BTreeSet<String>| -> Vec<String> {
        non_entity.intersection(set).cloned().collect()
    };

    Subtypes::Point {
        point_functions: facet(ontology.point_function_types()),
        phenomena: facet(ontology.closure_of(OntologyRoot::Phenomenon)),
        quantities: facet(ontology.closure_of(OntologyRoot::Quantity)),
    }
}

/// Every ordering of `items` (Heap's algorithm).
fn permutations<'a>(items: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut current = items.to_vec();
    let mut out = vec![current.clone()];
    let mut counters = vec![0usize; current.len()];

    let mut i = 1;
    while i < current.len() {
        if counters[i] < i {
            if i % 2 == 0 {
                current.swap(0, i);
            } else {
                current.swap(counters[i], i);
            }
            out.push(current.clone());
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    out
}
