//! Runtime settings, read from TOML.

use crate::error::ConfigError;
use crate::model::record::LEGACY_MARKER;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "haystack-typer.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ontology: OntologySettings,
    pub records: RecordSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OntologySettings {
    /// Haystack defs grid in JSON.
    pub defs: PathBuf,
}

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            defs: PathBuf::from("resources/defs.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    /// Rewrite `bad_marker` values to the canonical marker before typing.
    pub normalize_marker: bool,
    pub bad_marker: String,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            normalize_marker: true,
            bad_marker: LEGACY_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    /// Write the report document to `dir` on every `report` run.
    pub save: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            save: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::FileRead {
                path: path.as_ref().to_path_buf(),
                source,
            })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            return Self::from_file(fallback);
        }
        Ok(Self::default())
    }

    /// Default report paths for a building: `<dir>/report_<name>.{json,csv}`.
    #[must_use]
    pub fn report_path(&self, name: &str, extension: &str) -> PathBuf {
        self.output.dir.join(format!("report_{name}.{extension}"))
    }

    /// JSON and CSV report paths when saving is on, `None` otherwise.
    #[must_use]
    pub fn saved_report_paths(&self, name: &str) -> Option<(PathBuf, PathBuf)> {
        self.output
            .save
            .then(|| (self.report_path(name, "json"), self.report_path(name, "csv")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
        let s = Settings::default();
        assert!(s.records.normalize_marker);
        assert_eq!(s.records.bad_marker, "M");
        assert_eq!(s.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let s = Settings::parse(
            r#"
            [ontology]
            defs = "/opt/haystack/defs-3.9.7.json"

            [records]
            normalize_marker = false
            "#,
        )
        .unwrap();
        assert_eq!(s.ontology.defs, PathBuf::from("/opt/haystack/defs-3.9.7.json"));
        assert!(!s.records.normalize_marker);
        assert_eq!(s.records.bad_marker, "M");
        assert_eq!(s.output, OutputSettings::default());
    }

    #[test]
    fn rejects_bad_types() {
        assert!(matches!(
            Settings::parse("[logging]\njson = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn explicit_missing_file() {
        assert!(matches!(
            Settings::load(Some(Path::new("/nonexistent/typer.toml"))),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn report_paths() {
        let s = Settings::default();
        assert_eq!(
            s.report_path("pes", "json"),
            PathBuf::from("output/report_pes.json")
        );
    }

    #[test]
    fn reports_are_saved_by_default() {
        let (json, csv) = Settings::default().saved_report_paths("pes").unwrap();
        assert_eq!(json, PathBuf::from("output/report_pes.json"));
        assert_eq!(csv, PathBuf::from("output/report_pes.csv"));

        let s = Settings::parse("[output]\nsave = false").unwrap();
        assert_eq!(s.saved_report_paths("pes"), None);
        assert_eq!(s.output.dir, PathBuf::from("output"));
    }
}
