//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the accrual engine and the reports.

pub mod export;
pub mod lifecycle;
pub mod query;
pub mod report;

pub use export::{handle_export_command, ExportArgs};
pub use lifecycle::{handle_cancel_command, handle_close_command};
pub use query::{handle_query_command, QueryCommands};
pub use report::{handle_report_command, ReportCommands};

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{FundsPaths, Settings};
use crate::error::{FundsError, FundsResult};
use crate::export::{export_report_json, export_report_yaml, export_rows_csv};
use crate::models::period::parse_date;
use crate::models::{FamilyId, GoalId, Snapshot, StatusFilter};
use crate::services::ModeAliases;
use crate::storage::{JsonSnapshotStore, SnapshotFile, SnapshotProvider};

/// Output format for report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Terminal table
    #[default]
    Table,
    /// CSV rows
    Csv,
    /// JSON with export metadata
    Json,
    /// YAML with export metadata
    Yaml,
}

/// Everything a command needs: paths, settings and where the snapshot comes from
pub struct CliContext {
    pub paths: FundsPaths,
    pub settings: Settings,
    pub aliases: ModeAliases,
    snapshot_file: Option<PathBuf>,
}

impl CliContext {
    pub fn new(paths: FundsPaths, settings: Settings, snapshot_file: Option<PathBuf>) -> Self {
        let aliases = settings.aliases();
        Self {
            paths,
            settings,
            aliases,
            snapshot_file,
        }
    }

    /// Load the snapshot from `--snapshot` or the data directory
    pub fn load_snapshot(&self) -> FundsResult<Snapshot> {
        match &self.snapshot_file {
            Some(path) => SnapshotFile::new(path).load_snapshot(),
            None => self.store()?.load_snapshot(),
        }
    }

    /// The writable data directory store
    ///
    /// Unavailable when working from a snapshot file.
    pub fn store(&self) -> FundsResult<JsonSnapshotStore> {
        if let Some(path) = &self.snapshot_file {
            return Err(FundsError::Validation(format!(
                "Snapshot file {} is read-only; drop --snapshot to modify goals",
                path.display()
            )));
        }
        Ok(JsonSnapshotStore::new(self.paths.clone()))
    }

    pub fn currency_symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    /// Explicit scope or the configured default
    pub fn scope(&self, status: Option<StatusFilter>) -> StatusFilter {
        status.unwrap_or(self.settings.default_status_filter)
    }
}

/// Parse a family argument such as `F001` or `Ivanova Anna (F001)`
pub fn family_arg(value: &str) -> FundsResult<FamilyId> {
    FamilyId::from_labelish(value)
        .ok_or_else(|| FundsError::Validation("Family ID must not be empty".into()))
}

/// Parse a goal argument such as `G001` or `Graduation (G001)`
pub fn goal_arg(value: &str) -> FundsResult<GoalId> {
    GoalId::from_labelish(value)
        .ok_or_else(|| FundsError::Validation("Goal ID must not be empty".into()))
}

/// clap value parser for dates in any accepted format
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("invalid date '{}': use YYYY-MM-DD", value))
}

/// Open the output target: a file when given, stdout otherwise
pub fn open_output(output: Option<&Path>) -> FundsResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                FundsError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Write report rows in the requested format
///
/// `table` renders the terminal view and is only called for `Table`.
pub fn write_rows<T, F>(
    report: &str,
    rows: &[T],
    format: OutputFormat,
    output: Option<&Path>,
    table: F,
) -> FundsResult<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    let mut writer = open_output(output)?;
    match format {
        OutputFormat::Table => {
            write!(writer, "{}", table()).map_err(|e| FundsError::Export(e.to_string()))?
        }
        OutputFormat::Csv => export_rows_csv(rows, &mut writer)?,
        OutputFormat::Json => export_report_json(report, rows, &mut writer)?,
        OutputFormat::Yaml => export_report_yaml(report, rows, &mut writer)?,
    }
    writer.flush().map_err(|e| FundsError::Export(e.to_string()))?;

    if let Some(path) = output {
        println!("Wrote {} row(s) to: {}", rows.len(), path.display());
    }
    Ok(())
}
