//! File I/O for snapshot data
//!
//! Data files are read as JSON or YAML and rewritten through a temp file and
//! a rename, so an interrupted lifecycle write leaves the old file intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FundsError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> FundsError {
    FundsError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Open a file that must exist
fn open_existing(path: &Path) -> Result<BufReader<File>, FundsError> {
    if !path.exists() {
        return Err(FundsError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    Ok(BufReader::new(file))
}

/// Read a JSON collection file; a missing file reads as the empty collection
pub fn read_json<T, P>(path: P) -> Result<T, FundsError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.exists() {
        read_json_required(path)
    } else {
        Ok(T::default())
    }
}

/// Read a JSON file that must exist
pub fn read_json_required<T, P>(path: P) -> Result<T, FundsError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    serde_json::from_reader(open_existing(path)?).map_err(|e| storage_error("parse", path, e))
}

/// Read a YAML file that must exist
pub fn read_yaml_required<T, P>(path: P) -> Result<T, FundsError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    serde_yaml::from_reader(open_existing(path)?).map_err(|e| storage_error("parse", path, e))
}

/// Write pretty JSON through `<file>.json.tmp` and a rename
///
/// The temp file sits next to the target so the rename never crosses
/// filesystems.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FundsError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| storage_error("write", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("replace", path, e)
    })
}

/// Whether `path` exists and holds well-formed JSON
pub fn json_file_valid<P: AsRef<Path>>(path: P) -> bool {
    open_existing(path.as_ref())
        .map(|reader| serde_json::from_reader::<_, serde_json::Value>(reader).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "goal".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("test.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("test.json.tmp").exists());

        let loaded: TestData = read_json_required(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_read_yaml_required() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.yaml");

        assert!(read_yaml_required::<TestData, _>(&path).is_err());

        fs::write(&path, "name: goal\nvalue: 42\n").unwrap();
        let loaded: TestData = read_yaml_required(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_json_file_valid() {
        let temp_dir = TempDir::new().unwrap();
        let valid_path = temp_dir.path().join("valid.json");
        let invalid_path = temp_dir.path().join("invalid.json");

        fs::write(&valid_path, r#"{"name": "test"}"#).unwrap();
        assert!(json_file_valid(&valid_path));

        fs::write(&invalid_path, "not json at all").unwrap();
        assert!(!json_file_valid(&invalid_path));

        assert!(!json_file_valid(temp_dir.path().join("missing.json")));
    }

    #[test]
    fn test_parse_error_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();

        let err = read_json::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, FundsError::Storage(_)));
    }
}
