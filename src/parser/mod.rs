pub mod defs;
pub mod haystack;

pub use crate::error::{OntologyError, RecordSourceError};
pub use defs::DefGraph;
pub use haystack::{load_records, parse_records, write_records};
