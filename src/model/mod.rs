pub mod classification;
pub mod record;
pub mod report;

pub use classification::{Classification, Subtypes, TypingFailure};
pub use record::{Record, MARKER};
pub use report::{BuildingReport, EntityBreakdown, ReportSummary, TagCategory, TagCounts, OTHER_BUCKET};
