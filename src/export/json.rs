//! JSON Export functionality
//!
//! Report exports and full snapshot exports, both stamped with a schema
//! version and the producing app version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;

use crate::error::{FundsError, FundsResult};
use crate::models::{FamilyId, GoalId, Snapshot};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A report's rows with export metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a, T: Serialize> {
    pub schema_version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    pub report: &'a str,
    pub rows: &'a [T],
}

impl<'a, T: Serialize> ReportExport<'a, T> {
    pub fn new(report: &'a str, rows: &'a [T]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            report,
            rows,
        }
    }
}

/// Whole snapshot with export metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub metadata: ExportMetadata,
}

/// Counts for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub family_count: usize,
    pub goal_count: usize,
    pub participation_count: usize,
    pub payment_count: usize,
    #[serde(default)]
    pub issue_count: usize,
}

impl SnapshotExport {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let metadata = ExportMetadata {
            family_count: snapshot.families.len(),
            goal_count: snapshot.goals.len(),
            participation_count: snapshot.participation.len(),
            payment_count: snapshot.payments.len(),
            issue_count: snapshot.issues.len(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            snapshot: snapshot.clone(),
            metadata,
        }
    }

    /// References to unknown families or goals
    ///
    /// The engine tolerates all of these; the list is informational.
    pub fn dangling_references(&self) -> Vec<String> {
        let families: BTreeSet<&FamilyId> =
            self.snapshot.families.iter().map(|f| &f.id).collect();
        let goals: BTreeSet<&GoalId> = self.snapshot.goals.iter().map(|g| &g.id).collect();
        let mut problems = Vec::new();

        for record in &self.snapshot.participation {
            if !goals.contains(&record.goal_id) {
                problems.push(format!(
                    "Participation record references unknown goal {}",
                    record.goal_id
                ));
            }
            if !families.contains(&record.family_id) {
                problems.push(format!(
                    "Participation record references unknown family {}",
                    record.family_id
                ));
            }
        }

        for payment in &self.snapshot.payments {
            if !families.contains(&payment.family_id) {
                problems.push(format!(
                    "Payment references unknown family {}",
                    payment.family_id
                ));
            }
            if let Some(goal_id) = payment.goal() {
                if !goals.contains(goal_id) {
                    problems.push(format!("Payment references unknown goal {}", goal_id));
                }
            }
        }

        for issue in &self.snapshot.issues {
            if !goals.contains(&issue.goal_id) {
                problems.push(format!("Issue record references unknown goal {}", issue.goal_id));
            }
        }

        problems
    }
}

/// Export report rows to JSON
pub fn export_report_json<T: Serialize, W: Write>(
    report: &str,
    rows: &[T],
    writer: &mut W,
) -> FundsResult<()> {
    let export = ReportExport::new(report, rows);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| FundsError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FundsError::Export(e.to_string()))?;
    Ok(())
}

/// Export a whole snapshot to JSON
pub fn export_snapshot_json<W: Write>(
    snapshot: &Snapshot,
    writer: &mut W,
    pretty: bool,
) -> FundsResult<()> {
    let export = SnapshotExport::from_snapshot(snapshot);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FundsError::Export(e.to_string()))?;

    Ok(())
}
