//! Export module for family-funds
//!
//! Provides export functionality in multiple formats:
//! - CSV: report rows (spreadsheet-compatible)
//! - JSON: report rows or a full snapshot, machine-readable
//! - YAML: report rows or a full snapshot, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_rows_csv;
pub use json::{
    export_report_json, export_snapshot_json, ReportExport, SnapshotExport, EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_report_yaml, export_snapshot_yaml};
