use crate::error::ExportError;
use crate::model::BuildingReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write the full report, per-record classifications included.
///
/// Every map in the report is ordered, so the same building always
/// serializes to the same bytes.
pub fn export_json<P: AsRef<Path>>(report: &BuildingReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::ontology::{fixtures, OntologyIndex};
    use crate::reporter::report;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn writes_sorted_report() {
        let index = OntologyIndex::build(&fixtures::defs()).unwrap();
        let rows: Vec<Record> = serde_json::from_value(json!([
            {"id": "r:2", "site": "m:", "zone": "m:"},
            {"id": "r:1", "equip": "m:", "vav": "m:"},
        ]))
        .unwrap();
        let report = report("bldg", &rows, &index);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        export_json(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let doc: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(doc["summary"]["valid"], 2);
        assert_eq!(doc["breakdown"]["site"]["valid_markers"]["zone"], 1);
        assert_eq!(doc["entities"][1]["subtypes"]["subclasses_in_entity"], json!(["vav"]));

        let keys: Vec<&String> = doc["breakdown"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["equip", "site"]);

        export_json(&report, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn unwritable_path() {
        let index = OntologyIndex::build(&fixtures::defs()).unwrap();
        let report = report("bldg", &[], &index);
        assert!(matches!(
            export_json(&report, "/nonexistent/dir/report.json"),
            Err(ExportError::FileCreate { .. })
        ));
    }
}
