//! Storage initialization
//!
//! Handles first-run setup: default settings and empty data files.

use crate::config::paths::FundsPaths;
use crate::config::settings::Settings;
use crate::error::FundsError;

use super::file_io::write_json_atomic;
use super::json_store::{FamilyData, GoalData, IssueData, ParticipationData, PaymentData};

/// Initialize a data directory, leaving existing files untouched
///
/// Returns the number of files created.
pub fn initialize_storage(paths: &FundsPaths) -> Result<usize, FundsError> {
    paths.ensure_directories()?;
    let mut created = 0;

    if !paths.is_initialized() {
        Settings::default().save(paths)?;
        created += 1;
    }
    if !paths.families_file().exists() {
        write_json_atomic(paths.families_file(), &FamilyData::default())?;
        created += 1;
    }
    if !paths.goals_file().exists() {
        write_json_atomic(paths.goals_file(), &GoalData::default())?;
        created += 1;
    }
    if !paths.participation_file().exists() {
        write_json_atomic(paths.participation_file(), &ParticipationData::default())?;
        created += 1;
    }
    if !paths.payments_file().exists() {
        write_json_atomic(paths.payments_file(), &PaymentData::default())?;
        created += 1;
    }
    if !paths.issues_file().exists() {
        write_json_atomic(paths.issues_file(), &IssueData::default())?;
        created += 1;
    }

    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FundsPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonSnapshotStore, SnapshotProvider};
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_files_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FundsPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        assert_eq!(initialize_storage(&paths).unwrap(), 6);
        assert!(!needs_initialization(&paths));
        assert!(paths.goals_file().exists());
        assert!(paths.issues_file().exists());

        assert_eq!(initialize_storage(&paths).unwrap(), 0);

        let snapshot = JsonSnapshotStore::new(paths).load_snapshot().unwrap();
        assert!(snapshot.is_empty());
    }
}
