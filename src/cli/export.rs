//! Snapshot export command
//!
//! Writes the loaded snapshot with export metadata. A YAML export can be fed
//! back through `--snapshot`.

use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

use super::{open_output, CliContext};
use crate::error::{FundsError, FundsResult};
use crate::export::{export_snapshot_json, export_snapshot_yaml, SnapshotExport};

/// Snapshot export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SnapshotFormat {
    /// JSON (pretty-printed)
    #[default]
    Json,
    /// YAML with a comment header
    Yaml,
}

/// Arguments of the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value_t = SnapshotFormat::Json)]
    pub format: SnapshotFormat,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Handle the export command
pub fn handle_export_command(context: &CliContext, args: ExportArgs) -> FundsResult<()> {
    let snapshot = context.load_snapshot()?;

    for problem in SnapshotExport::from_snapshot(&snapshot).dangling_references() {
        warn!("{}", problem);
    }

    let mut writer = open_output(args.output.as_deref())?;
    match args.format {
        SnapshotFormat::Json => {
            export_snapshot_json(&snapshot, &mut writer, !args.compact)?;
            writeln!(writer).map_err(|e| FundsError::Export(e.to_string()))?;
        }
        SnapshotFormat::Yaml => export_snapshot_yaml(&snapshot, &mut writer)?,
    }
    writer.flush().map_err(|e| FundsError::Export(e.to_string()))?;

    if let Some(path) = &args.output {
        println!("Exported to: {}", path.display());
        println!(
            "  {} families, {} goals, {} participation records, {} payments, {} issue records",
            snapshot.families.len(),
            snapshot.goals.len(),
            snapshot.participation.len(),
            snapshot.payments.len(),
            snapshot.issues.len()
        );
    }
    Ok(())
}
