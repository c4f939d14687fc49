//! Goal Summary Report
//!
//! Per-goal collection progress: how much the goal needs, how much the
//! participants have paid and an estimate of how many more payers would
//! close the gap.

use serde::Serialize;
use std::io::Write;

use crate::display::tables::goal_summary_table;
use crate::error::FundsResult;
use crate::export::csv::export_rows_csv;
use crate::models::money::round_money;
use crate::models::{AccrualMode, GoalId, GoalStatus, StatusFilter};
use crate::services::{AccrualEngine, GoalEvaluation};

/// Progress of one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub goal_id: GoalId,
    pub name: String,
    pub mode: String,
    pub status: GoalStatus,
    /// `T × participants` for per-family charges, `T` otherwise
    pub target_total: f64,
    /// Paid by participants
    pub collected: f64,
    /// Participants, or the number of units for unit-price goals
    pub participant_count: u64,
    pub payer_count: u64,
    /// Whole units paid for (unit-price goals only)
    pub units_paid: Option<u64>,
    /// More payers needed to reach the target, when estimable
    pub payers_needed: Option<u64>,
    pub remaining: f64,
    pub overpaid: f64,
}

impl GoalSummary {
    /// Summarize one evaluated goal
    pub fn from_evaluation(evaluation: &GoalEvaluation<'_>) -> Self {
        let goal = evaluation.goal;
        let target = goal.target();
        let unit_price = goal.effective_fixed_cap();
        let participants = evaluation.participants.len() as u64;
        let payer_count = evaluation.payer_count() as u64;
        let collected = evaluation.collected();

        let target_total = match evaluation.mode {
            Some(AccrualMode::StaticPerFamily) => target * participants as f64,
            _ => target,
        };
        let remaining = round_money(target_total - collected).max(0.0);
        let overpaid = round_money(collected - target_total).max(0.0);

        let share = match evaluation.mode {
            Some(AccrualMode::StaticPerFamily) => Some(target),
            Some(AccrualMode::SharedTotalAll) if participants > 0 => {
                Some(target / participants as f64)
            }
            Some(AccrualMode::SharedTotalByPayers) => match unit_price {
                Some(fixed) => Some(fixed),
                None if payer_count > 0 => Some(target / payer_count as f64),
                None => None,
            },
            Some(AccrualMode::DynamicByPayers) | Some(AccrualMode::UnitPrice) => unit_price,
            _ => None,
        };
        let payers_needed = if remaining <= 0.0 {
            Some(0)
        } else {
            share
                .filter(|s| *s > 0.0)
                .map(|s| (remaining / s).ceil() as u64)
        };

        let (participant_count, units_paid) = match (evaluation.mode, unit_price) {
            (Some(AccrualMode::UnitPrice), Some(price)) => (
                (target / price).ceil() as u64,
                Some((collected / price).floor() as u64),
            ),
            _ => (participants, None),
        };

        Self {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            mode: evaluation.mode_label(),
            status: goal.status,
            target_total: round_money(target_total),
            collected: round_money(collected),
            participant_count,
            payer_count,
            units_paid,
            payers_needed,
            remaining,
            overpaid,
        }
    }
}

/// Goal Summary Report
#[derive(Debug, Clone)]
pub struct GoalSummaryReport {
    pub scope: StatusFilter,
    /// Open goals first, then closed ones
    pub goals: Vec<GoalSummary>,
}

impl GoalSummaryReport {
    /// Generate the report; any scope other than `Open` covers open and closed goals
    pub fn generate(engine: &AccrualEngine<'_>, scope: StatusFilter) -> Self {
        let scope = match scope {
            StatusFilter::Open => StatusFilter::Open,
            _ => StatusFilter::All,
        };

        let mut goals: Vec<GoalSummary> = engine
            .goals_in_scope(scope)
            .into_iter()
            .map(|goal| GoalSummary::from_evaluation(&engine.evaluate(goal)))
            .collect();
        // stable: snapshot order within each status
        goals.sort_by_key(|summary| summary.status != GoalStatus::Open);

        Self { scope, goals }
    }

    pub fn open_goals(&self) -> impl Iterator<Item = &GoalSummary> {
        self.goals.iter().filter(|g| g.status == GoalStatus::Open)
    }

    pub fn closed_goals(&self) -> impl Iterator<Item = &GoalSummary> {
        self.goals.iter().filter(|g| g.status == GoalStatus::Closed)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();
        output.push_str("Goal Summary\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        if self.goals.is_empty() {
            output.push_str("No goals in scope.\n");
            return output;
        }

        let open: Vec<&GoalSummary> = self.open_goals().collect();
        let closed: Vec<&GoalSummary> = self.closed_goals().collect();

        if self.scope == StatusFilter::Open {
            output.push_str(&goal_summary_table(&open, currency_symbol));
            output.push('\n');
            return output;
        }

        if !open.is_empty() {
            output.push_str("\nOPEN GOALS\n");
            output.push_str(&goal_summary_table(&open, currency_symbol));
            output.push('\n');
        }
        if !closed.is_empty() {
            output.push_str("\nCLOSED GOALS\n");
            output.push_str(&goal_summary_table(&closed, currency_symbol));
            output.push('\n');
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FundsResult<()> {
        export_rows_csv(&self.goals, writer)
    }
}
