use crate::error::ExportError;
use crate::model::{BuildingReport, TagCategory};
use std::fs::File;
use std::path::Path;

/// Write the tag breakdown in long form, one row per
/// (entity type, tag category, tag), ready for plotting.
pub fn export_csv<P: AsRef<Path>>(report: &BuildingReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["entity_type", "tag_category", "tag", "count"])?;

    for entity_type in report.entity_types() {
        for category in TagCategory::ALL {
            let Some(counts) = report.counts(entity_type, category) else {
                continue;
            };
            for (tag, count) in counts {
                writer.write_record([
                    entity_type,
                    category.as_str(),
                    tag.as_str(),
                    count.to_string().as_str(),
                ])?;
            }
        }
    }

    writer.flush().map_err(|e| ExportError::WriteError {
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
    use serde_json::json;

    #[test]
    fn long_form_rows() {
        let index = OntologyIndex::build(&fixtures::defs()).unwrap();
        let rows: Vec<Record> = serde_json::from_value(json!([
            {"id": "r:1", "equip": "m:", "vav": "m:"},
            {"id": "r:2", "equip": "m:", "vav": "m:", "custom": "m:"},
            {"id": "r:3", "junk": "m:"},
        ]))
        .unwrap();
        let report = report("bldg", &rows, &index);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        export_csv(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "entity_type,tag_category,tag,count\n\
             equip,valid_markers,equip,2\n\
             equip,valid_markers,vav,2\n\
             equip,invalid_markers,custom,1\n\
             other,invalid_markers,junk,1\n"
        );
    }
}
