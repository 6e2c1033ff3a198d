//! Tag-set queries and edits over building records.
//!
//! Everything here is total except [`remove_tag`], which mirrors a strict
//! pop and fails on the first record without the tag.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::TagError;
use crate::model::record::{
    is_marker, marker, record_id, DIS_TAG, EQUIP_REF_TAG, ID_TAG, NAV_NAME_TAG,
};
use crate::model::Record;

fn has_all(record: &Record, tags: &[&str]) -> bool {
    tags.iter().all(|tag| record.contains_key(*tag))
}

/// Split records into those carrying every tag in `required` and the rest.
///
/// Order is preserved on both sides.
#[must_use]
pub fn partition_by_tagset(records: Vec<Record>, required: &[&str]) -> (Vec<Record>, Vec<Record>) {
    records.into_iter().partition(|r| has_all(r, required))
}

/// As [`partition_by_tagset`], but a match that also carries every tag in
/// `excluded` is moved to the non-matching side.
#[must_use]
pub fn partition_by_tagset_exclusive(
    records: Vec<Record>,
    required: &[&str],
    excluded: &[&str],
) -> (Vec<Record>, Vec<Record>) {
    records
        .into_iter()
        .partition(|r| has_all(r, required) && !has_all(r, excluded))
}

/// Case-insensitive search of `needle` in each record's `navName`.
///
/// Records without a textual `navName` never match.
#[must_use]
pub fn find_in_display_name(records: Vec<Record>, needle: &str) -> (Vec<Record>, Vec<Record>) {
    let needle = needle.to_lowercase();
    records.into_iter().partition(|r| {
        r.get(NAV_NAME_TAG)
            .and_then(Value::as_str)
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    })
}

/// `(equips, rest)`; the point shortcuts below split on `point` plus the function.
#[must_use]
pub fn find_equips(records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    partition_by_tagset(records, &["equip"])
}

#[must_use]
pub fn find_sensors(records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    partition_by_tagset(records, &["point", "sensor"])
}

#[must_use]
pub fn find_cmds(records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    partition_by_tagset(records, &["point", "cmd"])
}

#[must_use]
pub fn find_sps(records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    partition_by_tagset(records, &["point", "sp"])
}

/// Points whose `equipRef` is the equip's `id`.
#[must_use]
pub fn find_equip_points<'a>(equip: &Record, records: &'a [Record]) -> Vec<&'a Record> {
    let Some(equip_id) = equip.get(ID_TAG) else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|r| r.get(EQUIP_REF_TAG) == Some(equip_id))
        .collect()
}

/// Human label for a record: `dis`, then `navName`.
#[must_use]
pub fn display_label(record: &Record) -> &str {
    record
        .get(DIS_TAG)
        .or_else(|| record.get(NAV_NAME_TAG))
        .and_then(Value::as_str)
        .unwrap_or("No dis available")
}

/// Set `tag` to the marker on every record, overwriting any existing value.
#[must_use]
pub fn set_marker(mut records: Vec<Record>, tag: &str) -> Vec<Record> {
    for record in &mut records {
        record.insert(tag.to_string(), marker());
    }
    records
}

/// Set `tag` to the marker on records carrying every tag in `required`.
#[must_use]
pub fn set_marker_where_tagset_subset(
    mut records: Vec<Record>,
    tag: &str,
    required: &[&str],
) -> Vec<Record> {
    for record in records.iter_mut().filter(|r| has_all(r, required)) {
        record.insert(tag.to_string(), marker());
    }
    records
}

/// Remove `tag` from every record.
///
/// # Errors
///
/// [`TagError::MissingTag`] on the first record that lacks the tag. Callers
/// doing bulk removal should partition on the tag first.
pub fn remove_tag(records: Vec<Record>, tag: &str) -> Result<Vec<Record>, TagError> {
    records
        .into_iter()
        .map(|mut record| match record.remove(tag) {
            Some(_) => Ok(record),
            None => Err(TagError::MissingTag {
                tag: tag.to_string(),
                id: record_id(&record),
            }),
        })
        .collect()
}

/// Rewrite every value equal to `bad_sentinel` to the canonical marker.
#[must_use]
pub fn normalize_marker_sentinel(mut records: Vec<Record>, bad_sentinel: &str) -> Vec<Record> {
    for record in &mut records {
        for value in record.values_mut() {
            if value.as_str() == Some(bad_sentinel) {
                *value = marker();
            }
        }
    }
    records
}

/// Marker tag names of one record.
#[must_use]
pub fn only_markers(record: &Record) -> Vec<String> {
    record
        .iter()
        .filter(|(_, v)| is_marker(v))
        .map(|(k, _)| k.clone())
        .collect()
}

/// Value tag names of one record.
#[must_use]
pub fn only_values(record: &Record) -> Vec<String> {
    record
        .iter()
        .filter(|(_, v)| !is_marker(v))
        .map(|(k, _)| k.clone())
        .collect()
}

/// Every marker tag name used across `records`, first occurrence order.
#[must_use]
pub fn only_markers_in(records: &[Record]) -> Vec<String> {
    dedup_in_order(records.iter().flat_map(only_markers))
}

/// Every value tag name used across `records`, first occurrence order.
#[must_use]
pub fn only_values_in(records: &[Record]) -> Vec<String> {
    dedup_in_order(records.iter().flat_map(only_values))
}

fn dedup_in_order(tags: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tags.filter(|tag| seen.insert(tag.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MARKER;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn building() -> Vec<Record> {
        vec![
            rec(json!({"id": "r:1", "equip": "m:", "vav": "m:", "navName": "VAV-101"})),
            rec(json!({"id": "r:2", "point": "m:", "sensor": "m:", "equipRef": "r:1"})),
            rec(json!({"id": "r:3", "equip": "m:", "navName": "FCU 2 North"})),
            rec(json!({"id": "r:4", "point": "m:", "cmd": "M", "equipRef": "r:3"})),
            rec(json!({"id": "r:5", "site": "m:", "dis": "HQ", "area": 1200})),
        ]
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records.iter().filter_map(record_id).collect()
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        for required in [&["equip"][..], &["point", "sensor"], &[], &["nope"]] {
            let (hit, miss) = partition_by_tagset(building(), required);
            assert_eq!(hit.len() + miss.len(), 5);
            let mut all = ids(&hit);
            all.extend(ids(&miss));
            all.sort();
            assert_eq!(all, vec!["r:1", "r:2", "r:3", "r:4", "r:5"]);
            assert!(ids(&hit).iter().all(|id| !ids(&miss).contains(id)));
        }
    }

    #[test]
    fn partition_keeps_order() {
        let (hit, miss) = partition_by_tagset(building(), &["equip"]);
        assert_eq!(ids(&hit), vec!["r:1", "r:3"]);
        assert_eq!(ids(&miss), vec!["r:2", "r:4", "r:5"]);
    }

    #[test]
    fn exclusive_partition_drops_excluded_supersets() {
        let (hit, miss) = partition_by_tagset_exclusive(building(), &["equip"], &["equip", "vav"]);
        assert_eq!(ids(&hit), vec!["r:3"]);
        assert_eq!(miss.len(), 4);
    }

    #[test]
    fn display_name_search_ignores_case_and_missing_names() {
        let (hit, miss) = find_in_display_name(building(), "fcu");
        assert_eq!(ids(&hit), vec!["r:3"]);
        assert_eq!(ids(&miss), vec!["r:1", "r:2", "r:4", "r:5"]);
    }

    #[test]
    fn point_shortcuts() {
        let (sensors, _) = find_sensors(building());
        assert_eq!(ids(&sensors), vec!["r:2"]);
        let (cmds, _) = find_cmds(normalize_marker_sentinel(building(), "M"));
        assert_eq!(ids(&cmds), vec!["r:4"]);
        let (sps, _) = find_sps(building());
        assert!(sps.is_empty());
        let (equips, _) = find_equips(building());
        assert_eq!(ids(&equips), vec!["r:1", "r:3"]);
    }

    #[test]
    fn equip_points_follow_equip_ref() {
        let bldg = building();
        let points = find_equip_points(&bldg[2], &bldg);
        assert_eq!(points.len(), 1);
        assert_eq!(record_id(points[0]).as_deref(), Some("r:4"));
        assert!(find_equip_points(&Record::new(), &bldg).is_empty());
    }

    #[test]
    fn labels() {
        let bldg = building();
        assert_eq!(display_label(&bldg[4]), "HQ");
        assert_eq!(display_label(&bldg[0]), "VAV-101");
        assert_eq!(display_label(&bldg[1]), "No dis available");
    }

    #[test]
    fn set_marker_overwrites() {
        let out = set_marker(building(), "navName");
        assert!(out.iter().all(|r| r["navName"] == json!(MARKER)));
    }

    #[test]
    fn conditional_marker_leaves_others_untouched() {
        let before = building();
        let out = set_marker_where_tagset_subset(before.clone(), "fcu", &["equip"]);
        assert_eq!(out[0]["fcu"], json!(MARKER));
        assert_eq!(out[2]["fcu"], json!(MARKER));
        assert_eq!(out[1], before[1]);
        assert_eq!(out[3], before[3]);
        assert_eq!(out[4], before[4]);
    }

    #[test]
    fn remove_tag_is_strict() {
        let (equips, _) = find_equips(building());
        let out = remove_tag(equips, "equip").unwrap();
        assert!(out.iter().all(|r| !r.contains_key("equip")));

        let err = remove_tag(building(), "equip").unwrap_err();
        assert!(matches!(
            err,
            TagError::MissingTag { ref tag, id: Some(ref id) } if tag == "equip" && id == "r:2"
        ));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_marker_sentinel(building(), "M");
        let twice = normalize_marker_sentinel(once.clone(), "M");
        assert_eq!(once, twice);
        assert_eq!(once[3]["cmd"], json!(MARKER));
        assert_eq!(once[4]["area"], json!(1200));
    }

    #[test]
    fn markers_and_values() {
        let bldg = building();
        let mut markers = only_markers(&bldg[3]);
        markers.sort();
        assert_eq!(markers, vec!["point"]);
        let mut values = only_values(&bldg[3]);
        values.sort();
        assert_eq!(values, vec!["cmd", "equipRef", "id"]);

        let mut all = only_markers_in(&bldg);
        all.sort();
        assert_eq!(all, vec!["equip", "point", "sensor", "site", "vav"]);
        let values = only_values_in(&bldg);
        assert_eq!(values.iter().filter(|v| *v == "id").count(), 1);
    }
}
