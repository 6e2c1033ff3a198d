//! # Haystack Typer
//!
//! Classifies Project Haystack building entities against the defs ontology
//! and reports which tags a building uses correctly.
//!
//! ## Features
//!
//! - Load Haystack JSON grids and defs documents
//! - Type each entity: exactly one first-class entity marker, plus equip
//!   subclasses or point function/phenomenon/quantity facets
//! - Building-wide tag usage by entity type
//! - Export to JSON and CSV, browse in the terminal
//! - navName-driven marker migrations
//!
//! ## Example
//!
//! ```no_run
//! use haystack_typer::ontology::OntologyIndex;
//! use haystack_typer::parser::load_records;
//! use haystack_typer::reporter::report;
//! use haystack_typer::tags::normalize_marker_sentinel;
//!
//! let ontology = OntologyIndex::load("resources/defs.json").expect("defs");
//! let rows = normalize_marker_sentinel(load_records("carytown.json").expect("rows"), "M");
//! let report = report("carytown", &rows, &ontology);
//! println!("valid: {}", report.summary.valid);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod ontology;
pub mod parser;
pub mod reporter;
pub mod tags;
pub mod typer;
pub mod ui;
