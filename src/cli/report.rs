//! Report CLI commands
//!
//! Implements CLI commands for the detail, balance, goal summary and issue
//! status reports.

use clap::Subcommand;
use std::path::PathBuf;

use super::{family_arg, write_rows, CliContext, OutputFormat};
use crate::error::FundsResult;
use crate::models::StatusFilter;
use crate::reports::{BalanceReport, DetailReport, GoalSummaryReport, IssueStatusReport};
use crate::services::AccrualEngine;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Paid and accrued per (family, goal), plus free payments
    Detail {
        /// Goal scope (open, closed, all)
        #[arg(short, long)]
        status: Option<StatusFilter>,
        /// Only rows of this family
        #[arg(long)]
        family: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Incoming, charged, reserved and free balance per family
    Balance {
        /// Only this family
        #[arg(long)]
        family: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Collection progress per goal
    Summary {
        /// Goal scope; `open` shows open goals, anything else shows all
        #[arg(short, long)]
        status: Option<StatusFilter>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Units paid for, handed out and still waiting per hand-out goal
    Issues {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(context: &CliContext, cmd: ReportCommands) -> FundsResult<()> {
    let snapshot = context.load_snapshot()?;
    let engine = AccrualEngine::new(&snapshot, &context.aliases);
    let symbol = context.currency_symbol();

    match cmd {
        ReportCommands::Detail {
            status,
            family,
            format,
            output,
        } => {
            let family_id = family.as_deref().map(family_arg).transpose()?;
            let report = DetailReport::generate(&engine, context.scope(status), family_id.as_ref());
            write_rows("detail", &report.rows, format, output.as_deref(), || {
                report.format_terminal(symbol)
            })?;
        }

        ReportCommands::Balance {
            family,
            format,
            output,
        } => {
            let family_id = family.as_deref().map(family_arg).transpose()?;
            let report = BalanceReport::generate(&engine, family_id.as_ref());
            write_rows("balance", &report.rows, format, output.as_deref(), || {
                report.format_terminal(symbol)
            })?;
        }

        ReportCommands::Summary {
            status,
            format,
            output,
        } => {
            let report = GoalSummaryReport::generate(&engine, context.scope(status));
            write_rows("summary", &report.goals, format, output.as_deref(), || {
                report.format_terminal(symbol)
            })?;
        }

        ReportCommands::Issues { format, output } => {
            let report = IssueStatusReport::generate(&engine);
            write_rows("issues", &report.rows, format, output.as_deref(), || {
                report.format_terminal(symbol)
            })?;
        }
    }

    Ok(())
}
