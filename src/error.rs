//! Error types for Haystack Typer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading the Haystack defs ontology.
///
/// Any of these aborts a classification run: closures must be complete
/// for the valid/invalid set arithmetic to mean anything.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// Failed to read the defs document from disk.
    #[error("failed to read defs '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The defs document is not valid JSON.
    #[error("defs document is not valid JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The defs document is valid JSON but not a defs grid.
    #[error("malformed defs document: {message}")]
    Malformed { message: String },

    /// A root class was queried that the document never defines.
    #[error("ontology does not define root class '{root}'")]
    UnknownRoot { root: String },
}

/// Errors that can occur when reading or writing building records.
#[derive(Debug, Error)]
pub enum RecordSourceError {
    /// Failed to read the records file from disk.
    #[error("failed to read records '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the records file.
    #[error("failed to write records '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The records file is not valid JSON.
    #[error("records file is not valid JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The grid has no `rows` array.
    #[error("records grid has no 'rows' array")]
    MissingRows,

    /// A row is not a tag mapping.
    #[error("row {index} is not a JSON object")]
    InvalidRow { index: usize },
}

/// Errors raised by strict tag operations.
#[derive(Debug, Error)]
pub enum TagError {
    /// `remove_tag` met a record without the tag.
    #[error("record {} has no tag '{tag}'", id.as_deref().unwrap_or("<no id>"))]
    MissingTag { tag: String, id: Option<String> },
}

/// Errors that can occur while migrating a building's records.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Tag(#[from] TagError),

    /// A sanity count differs before and after the migration.
    #[error("number of {what} changed: {before} before, {after} after")]
    CountChanged {
        what: &'static str,
        before: usize,
        after: usize,
    },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
