use crate::model::{BuildingReport, TagCategory};
use std::io::{self, Write};

/// Human-readable report summary: the typing counts, then one line per
/// entity type with the number of distinct tags in each category.
pub fn write_summary<W: Write>(report: &BuildingReport, out: &mut W) -> io::Result<()> {
    let s = &report.summary;
    writeln!(out, "Report for {}", report.name)?;
    writeln!(out, "Number of entities: {}", s.total)?;
    writeln!(out, "Number of valid entities: {}", s.valid)?;
    writeln!(
        out,
        "Number of entities w/no first class entity defined: {}",
        s.no_fc_entity
    )?;
    writeln!(
        out,
        "Number of entities w/multiple first class entities defined: {}",
        s.mult_fc_entities
    )?;
    if s.missing_id > 0 {
        writeln!(out, "  of which w/no id: {}", s.missing_id)?;
    }
    writeln!(out)?;

    write!(out, "{:<16} {:>8}", "entity type", "records")?;
    for category in TagCategory::ALL {
        write!(out, " {:>16}", category.label())?;
    }
    writeln!(out)?;

    for entity_type in report.entity_types() {
        write!(
            out,
            "{:<16} {:>8}",
            entity_type,
            report.records_of_type(entity_type)
        )?;
        for category in TagCategory::ALL {
            let distinct = report.counts(entity_type, category).map_or(0, |c| c.len());
            write!(out, " {distinct:>16}")?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Building vocabulary: {} valid / {} invalid markers, {} valid / {} invalid values",
        report.valid_markers.len(),
        report.invalid_markers.len(),
        report.valid_values.len(),
        report.invalid_values.len()
    )?;
    Ok(())
}

pub fn print_summary(report: &BuildingReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_summary(report, &mut lock)?;
    lock.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::ontology::{fixtures, OntologyIndex};
    use crate::reporter::report;
    use serde_json::json;

    fn render(rows: serde_json::Value) -> String {
        let index = OntologyIndex::build(&fixtures::defs()).unwrap();
        let rows: Vec<Record> = serde_json::from_value(rows).unwrap();
        let report = report("carytown", &rows, &index);
        let mut out = Vec::new();
        write_summary(&report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn shows_counts_and_entity_lines() {
        let text = render(json!([
            {"id": "r:1", "equip": "m:", "vav": "m:"},
            {"id": "r:3", "equip": "m:", "point": "m:"},
        ]));
        assert!(text.starts_with("Report for carytown\n"));
        assert!(text.contains("Number of valid entities: 1\n"));
        assert!(text.contains("Number of entities w/no first class entity defined: 0\n"));
        assert!(text.contains("Number of entities w/multiple first class entities defined: 1\n"));
        assert!(!text.contains("w/no id"));
        assert!(text.lines().any(|l| l.starts_with("equip ")));
        assert!(text.lines().any(|l| l.starts_with("other ")));
    }

    #[test]
    fn all_invalid_building_still_prints_counts() {
        let text = render(json!([{"dis": "orphan"}, {"id": "r:2"}]));
        assert!(text.contains("Number of valid entities: 0\n"));
        assert!(text.contains("  of which w/no id: 1\n"));
        assert!(text.contains("Number of entities w/no first class entity defined: 2\n"));
    }
}
