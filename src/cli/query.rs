//! Accrual query commands
//!
//! Single-value and diagnostic queries against the engine: accrual totals,
//! per-goal breakdowns, the cap solver, participant sets and membership.

use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;
use std::path::PathBuf;

use super::{family_arg, goal_arg, parse_date_arg, write_rows, CliContext, OutputFormat};
use crate::display::{breakdown_table, format_explanation, format_member, format_participants};
use crate::error::{FundsError, FundsResult};
use crate::models::{format_amount, StatusFilter};
use crate::services::{solve_cap, AccrualEngine};

/// Query subcommands
#[derive(Subcommand)]
pub enum QueryCommands {
    /// Total accrued for a family over goals in scope
    Accrual {
        /// Family ID or label such as "Ivanova Anna (F001)"
        family: String,
        /// Goal scope (open, closed, all)
        #[arg(short, long)]
        status: Option<StatusFilter>,
    },

    /// Per-goal accruals of a family
    Breakdown {
        /// Family ID or label
        family: String,
        /// Goal scope (open, closed, all)
        #[arg(short, long)]
        status: Option<StatusFilter>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve the water-filling cap for a target and contributions
    SolveCap {
        /// Amount to collect
        #[arg(allow_negative_numbers = true)]
        target: f64,
        /// Contributions; non-positive values are ignored
        #[arg(allow_negative_numbers = true)]
        contributions: Vec<f64>,
    },

    /// Paid, accrued and balance of a family on one goal
    Goal {
        /// Family ID or label
        family: String,
        /// Goal ID or label
        goal: String,
    },

    /// Show how a family's accrual on a goal was computed
    Explain {
        /// Goal ID or label
        goal: String,
        /// Family ID or label
        family: String,
    },

    /// List the resolved participants of a goal
    Participants {
        /// Goal ID or label
        goal: String,
    },

    /// Membership status and exit balance of a family
    Member {
        /// Family ID or label
        family: String,
        /// Date to check membership on (default: today)
        #[arg(short, long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        /// Year for the membership months count (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle a query command
pub fn handle_query_command(context: &CliContext, cmd: QueryCommands) -> FundsResult<()> {
    if let QueryCommands::SolveCap {
        target,
        contributions,
    } = &cmd
    {
        println!("{}", solve_cap(*target, contributions));
        return Ok(());
    }

    let snapshot = context.load_snapshot()?;
    let engine = AccrualEngine::new(&snapshot, &context.aliases);
    let symbol = context.currency_symbol();

    match cmd {
        QueryCommands::Accrual { family, status } => {
            let family_id = family_arg(&family)?;
            let accrued = engine.compute_accrual(&family_id, context.scope(status));
            println!("{}", format_amount(accrued, symbol));
        }

        QueryCommands::Breakdown {
            family,
            status,
            format,
            output,
        } => {
            let family_id = family_arg(&family)?;
            let entries = engine.compute_breakdown(&family_id, context.scope(status));

            if entries.is_empty() && format == OutputFormat::Table && output.is_none() {
                println!("No accruals for family {}.", family_id);
                return Ok(());
            }
            write_rows("breakdown", &entries, format, output.as_deref(), || {
                format!("{}\n", breakdown_table(&entries, symbol))
            })?;
        }

        QueryCommands::SolveCap { .. } => {}

        QueryCommands::Goal { family, goal } => {
            let family_id = family_arg(&family)?;
            let goal_id = goal_arg(&goal)?;
            if snapshot.goal(&goal_id).is_none() {
                return Err(FundsError::goal_not_found(goal_id.as_str()));
            }

            println!("Family {} / Goal {}", family_id, goal_id);
            println!(
                "  Paid:     {}",
                format_amount(engine.paid_to_goal(&family_id, &goal_id), symbol)
            );
            println!(
                "  Accrued:  {}",
                format_amount(engine.accrued_for_goal(&family_id, &goal_id), symbol)
            );
            println!(
                "  Balance:  {}",
                format_amount(engine.balance_for_goal(&family_id, &goal_id), symbol)
            );
        }

        QueryCommands::Explain { goal, family } => {
            let goal_id = goal_arg(&goal)?;
            let family_id = family_arg(&family)?;
            let explanation = engine
                .explain(&goal_id, &family_id)
                .ok_or_else(|| FundsError::goal_not_found(goal_id.as_str()))?;
            print!("{}", format_explanation(&explanation, symbol));
        }

        QueryCommands::Participants { goal } => {
            let goal_id = goal_arg(&goal)?;
            let participants = engine
                .participants(&goal_id)
                .ok_or_else(|| FundsError::goal_not_found(goal_id.as_str()))?;
            print!("{}", format_participants(&goal_id, &participants, &snapshot));
        }

        QueryCommands::Member { family, date, year } => {
            let family_id = family_arg(&family)?;
            let record = snapshot
                .family(&family_id)
                .ok_or_else(|| FundsError::family_not_found(family_id.as_str()))?;
            let today = Local::now().date_naive();
            let date = date.unwrap_or(today);
            let year = year.unwrap_or_else(|| date.year());

            print!(
                "{}",
                format_member(record, date, year, engine.exit_balance(&family_id), symbol)
            );
        }
    }

    Ok(())
}
