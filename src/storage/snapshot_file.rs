//! Single-file snapshots
//!
//! A whole snapshot in one YAML or JSON document, chosen by file extension.
//! Useful for replaying a computation against a frozen data set.

use std::path::{Path, PathBuf};

use super::file_io::{read_json_required, read_yaml_required};
use super::SnapshotProvider;
use crate::error::FundsResult;
use crate::models::Snapshot;

/// Read-only provider for one snapshot document
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false)
    }
}

impl SnapshotProvider for SnapshotFile {
    fn load_snapshot(&self) -> FundsResult<Snapshot> {
        if self.is_yaml() {
            read_yaml_required(&self.path)
        } else {
            read_json_required(&self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const YAML: &str = r#"
families:
  - id: F1
    name: Anna
  - id: F2
    active: false
goals:
  - id: G1
    accrual_mode: static_per_child
    target_amount: 500
participation:
  - goal_id: G1
    family_id: F2
    status: participates
payments:
  - family_id: F1
    goal_id: G1
    amount: 500
  - family_id: F2
    amount: 20
"#;

    #[test]
    fn test_load_yaml_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.yaml");
        fs::write(&path, YAML).unwrap();

        let snapshot = SnapshotFile::new(&path).load_snapshot().unwrap();
        assert_eq!(snapshot.families.len(), 2);
        assert!(!snapshot.families[1].active);
        assert_eq!(snapshot.goals[0].accrual_mode, "static_per_child");
        assert_eq!(snapshot.participation.len(), 1);
        assert_eq!(snapshot.payments[1].goal_id, None);
    }

    #[test]
    fn test_load_json_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(&path, r#"{"goals": [{"id": "G1", "accrual_mode": "voluntary"}]}"#).unwrap();

        let snapshot = SnapshotFile::new(&path).load_snapshot().unwrap();
        assert_eq!(snapshot.goals.len(), 1);
        assert!(snapshot.families.is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(temp_dir.path().join("nope.yml"));
        assert!(file.load_snapshot().is_err());
    }
}
