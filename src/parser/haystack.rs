use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::error::RecordSourceError;
use crate::model::Record;

/// Loads building records from a Haystack JSON grid.
///
/// Only the `rows` of the grid are returned; `meta` and `cols` are ignored.
/// Rows must be JSON objects, but their tag values are kept as they are,
/// so legacy marker encodings survive until
/// [`normalize_marker_sentinel`](crate::tags::normalize_marker_sentinel).
///
/// # Errors
///
/// Returns [`RecordSourceError::FileRead`] if the file cannot be read,
/// [`RecordSourceError::Json`] if it is not JSON, and
/// [`RecordSourceError::MissingRows`] / [`RecordSourceError::InvalidRow`]
/// if it is not a grid of tag mappings.
///
/// # Example
///
/// ```no_run
/// use haystack_typer::parser::load_records;
///
/// let rows = load_records("carytown.json")?;
/// println!("{} entities", rows.len());
/// # Ok::<(), haystack_typer::error::RecordSourceError>(())
/// ```
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, RecordSourceError> {
    let content = std::fs::read_to_string(&path).map_err(|source| RecordSourceError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;

    let records = parse_records(&content)?;
    info!(
        path = %path.as_ref().display(),
        records = records.len(),
        "loaded building records"
    );
    Ok(records)
}

pub fn parse_records(content: &str) -> Result<Vec<Record>, RecordSourceError> {
    let mut grid: Value = serde_json::from_str(content)?;

    let rows = match grid.get_mut("rows").map(Value::take) {
        Some(Value::Array(rows)) => rows,
        _ => return Err(RecordSourceError::MissingRows),
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Object(record) => Ok(record),
            _ => Err(RecordSourceError::InvalidRow { index }),
        })
        .collect()
}

/// Write records back out as a Haystack JSON grid.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<(), RecordSourceError> {
    let path_ref = path.as_ref();
    let grid = json!({
        "meta": {"ver": "3.0"},
        "rows": records,
    });
    let content = serde_json::to_string_pretty(&grid)?;

    let mut file = File::create(path_ref).map_err(|source| RecordSourceError::FileWrite {
        path: path_ref.to_path_buf(),
        source,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|source| RecordSourceError::FileWrite {
            path: path_ref.to_path_buf(),
            source,
        })?;

    info!(path = %path_ref.display(), records = records.len(), "wrote building records");
    Ok(())
}
