//! Study-progress analytics for exam preparation: typed records, the
//! dashboard insight calculations, per-collection statistics and the
//! Postgres record store they are read from.

pub mod db;
pub mod import;
pub mod insights;
pub mod models;
pub mod report;
pub mod stats;
pub mod validate;
pub mod window;

pub use insights::compute_insights;
pub use models::Insights;
