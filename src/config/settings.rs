//! User settings for family-funds
//!
//! Currency symbol, default goal scope, the legacy accrual mode alias table
//! and the log filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::paths::FundsPaths;
use crate::error::FundsError;
use crate::logging::DEFAULT_LOG_FILTER;
use crate::models::StatusFilter;
use crate::services::ModeAliases;

/// User settings for family-funds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of the settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol printed before amounts in terminal output
    #[serde(default)]
    pub currency_symbol: String,

    /// Goal scope used when a command gets no `--status`
    #[serde(default)]
    pub default_status_filter: StatusFilter,

    /// Legacy mode name → canonical mode name
    #[serde(default = "ModeAliases::default_table")]
    pub mode_aliases: BTreeMap<String, String>,

    /// `tracing` filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: String::new(),
            default_status_filter: StatusFilter::default(),
            mode_aliases: ModeAliases::default_table(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// The alias table handed to the engine
    pub fn aliases(&self) -> ModeAliases {
        ModeAliases::new(self.mode_aliases.clone())
    }

    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &FundsPaths) -> Result<Self, FundsError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FundsError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| FundsError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FundsPaths) -> Result<(), FundsError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FundsError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FundsError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
