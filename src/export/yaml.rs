//! YAML Export functionality
//!
//! Human-readable report and snapshot exports. A snapshot exported here can
//! be loaded back with `--snapshot`.

use serde::Serialize;
use std::io::Write;

use crate::error::{FundsError, FundsResult};
use crate::export::json::{ReportExport, SnapshotExport};
use crate::models::Snapshot;

/// Export report rows to YAML
pub fn export_report_yaml<T: Serialize, W: Write>(
    report: &str,
    rows: &[T],
    writer: &mut W,
) -> FundsResult<()> {
    let export = ReportExport::new(report, rows);
    serde_yaml::to_writer(writer, &export).map_err(|e| FundsError::Export(e.to_string()))?;
    Ok(())
}

/// Export a whole snapshot to YAML
pub fn export_snapshot_yaml<W: Write>(snapshot: &Snapshot, writer: &mut W) -> FundsResult<()> {
    let export = SnapshotExport::from_snapshot(snapshot);

    writeln!(writer, "# family-funds snapshot export")
        .map_err(|e| FundsError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| FundsError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| FundsError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FundsError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FundsError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccrualMode, Family, Goal};
    use crate::storage::{SnapshotFile, SnapshotProvider};
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_yaml_round_trip() {
        let snapshot = Snapshot {
            families: vec![Family::new("F1", "Anna")],
            goals: vec![Goal::new("G1", AccrualMode::UnitPrice, 300.0).with_fixed_cap(100.0)],
            ..Default::default()
        };

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        export_snapshot_yaml(&snapshot, &mut file).unwrap();
        drop(file);

        let loaded = SnapshotFile::new(&path).load_snapshot().unwrap();
        assert_eq!(loaded.goals[0].fixed_cap, Some(100.0));
        assert_eq!(loaded.families[0].name, "Anna");
    }

    #[test]
    fn test_report_yaml() {
        let rows = vec!["a", "b"];
        let mut buffer = Vec::new();
        export_report_yaml("letters", &rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("report: letters"));
    }
}
