//! Terminal browser for a building report.

pub mod app;
pub mod dashboard;

pub use app::App;
