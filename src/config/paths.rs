//! Path management for family-funds
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` command-line flag
//! 2. `FAMILY_FUNDS_DATA_DIR` environment variable (if set)
//! 3. The platform config directory from `directories` (`family-funds`)

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::FundsError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FAMILY_FUNDS_DATA_DIR";

/// Manages all paths used by family-funds
#[derive(Debug, Clone)]
pub struct FundsPaths {
    base_dir: PathBuf,
}

impl FundsPaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FundsError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };
        Ok(Self { base_dir })
    }

    /// Resolve with an optional explicit override taking precedence
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, FundsError> {
        match explicit {
            Some(dir) => Ok(Self::with_base_dir(dir.to_path_buf())),
            None => Self::new(),
        }
    }

    /// Create FundsPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the four data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn families_file(&self) -> PathBuf {
        self.data_dir().join("families.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    pub fn participation_file(&self) -> PathBuf {
        self.data_dir().join("participation.json")
    }

    pub fn payments_file(&self) -> PathBuf {
        self.data_dir().join("payments.json")
    }

    pub fn issues_file(&self) -> PathBuf {
        self.data_dir().join("issues.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), FundsError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FundsError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FundsError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if a config file exists
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, FundsError> {
    ProjectDirs::from("", "", "family-funds")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FundsError::Config("Could not determine a home directory".into()))
}
