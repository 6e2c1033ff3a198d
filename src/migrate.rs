//! Tag migrations for a building's records.
//!
//! Each migration splits the building, edits one side and reassembles it,
//! then re-counts before handing the records back. A count that moved means
//! the reassembly lost or duplicated records and the result is rejected.

use tracing::info;

use crate::error::MigrationError;
use crate::model::Record;
use crate::tags::{
    find_equips, find_in_display_name, partition_by_tagset, remove_tag, set_marker,
};

#[derive(Debug)]
pub struct Migration {
    pub records: Vec<Record>,
    /// Records the migration edited.
    pub changed: usize,
}

/// Add `tag` as a marker to every equip whose `navName` contains `needle`.
///
/// The building comes back as non-equips, untouched equips, then the newly
/// marked equips.
pub fn mark_by_display_name(
    records: Vec<Record>,
    needle: &str,
    tag: &str,
) -> Result<Migration, MigrationError> {
    let total = records.len();
    let (equips, non_equips) = find_equips(records);
    let equip_count = equips.len();

    let (hits, untouched) = find_in_display_name(equips, needle);
    let changed = hits.len();
    let hits = set_marker(hits, tag);

    let mut building = non_equips;
    building.extend(untouched);
    building.extend(hits);

    check("entities", total, building.len())?;
    check("equips", equip_count, count_with(&building, &["equip"]))?;
    check("marked equips", changed, count_with(&building, &["equip", tag]))?;

    info!(needle, tag, changed, "marked equips by navName");
    Ok(Migration {
        records: building,
        changed,
    })
}

/// Remove `tag` from every record that carries it.
pub fn strip_tag(records: Vec<Record>, tag: &str) -> Result<Migration, MigrationError> {
    let total = records.len();
    let (carriers, others) = partition_by_tagset(records, &[tag]);
    let changed = carriers.len();

    let mut building = others;
    building.extend(remove_tag(carriers, tag)?);

    check("entities", total, building.len())?;
    check("carriers", 0, count_with(&building, &[tag]))?;

    info!(tag, changed, "stripped tag");
    Ok(Migration {
        records: building,
        changed,
    })
}

fn count_with(records: &[Record], tags: &[&str]) -> usize {
    records
        .iter()
        .filter(|r| tags.iter().all(|t| r.contains_key(*t)))
        .count()
}

fn check(what: &'static str, before: usize, after: usize) -> Result<(), MigrationError> {
    if before == after {
        Ok(())
    } else {
        Err(MigrationError::CountChanged {
            what,
            before,
            after,
        })
    }
}
