//! Issue Status Report
//!
//! For unit-price goals whose items go out to the children: how many units
//! the target buys, how many the families have paid for, how many were
//! already handed out and how many are still waiting.

use serde::Serialize;
use std::io::Write;

use crate::display::tables::issue_status_table;
use crate::error::FundsResult;
use crate::export::csv::export_rows_csv;
use crate::models::money::round_money;
use crate::models::{issued_units_by_goal, AccrualMode, GoalId, GoalStatus};
use crate::services::{AccrualEngine, GoalEvaluation};

/// Hand-out state of one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueStatusRow {
    pub goal_id: GoalId,
    pub name: String,
    pub status: GoalStatus,
    pub unit_price: f64,
    /// `ceil(T / unit_price)`
    pub total_units: u64,
    /// Whole units per participating payer, summed
    pub units_paid: u64,
    pub units_issued: f64,
    /// Paid-for units (capped at the total) not yet handed out
    pub remaining: f64,
}

impl IssueStatusRow {
    /// Build the row, or `None` when the goal is not a hand-out goal
    pub fn from_evaluation(evaluation: &GoalEvaluation<'_>, units_issued: f64) -> Option<Self> {
        let goal = evaluation.goal;
        if !goal.issue_to_children || evaluation.mode != Some(AccrualMode::UnitPrice) {
            return None;
        }
        let unit_price = goal.effective_fixed_cap()?;

        let total_units = (goal.target() / unit_price).ceil() as u64;
        // floor per family: two half-paid units are not one unit
        let units_paid: u64 = evaluation
            .payments
            .iter()
            .filter(|(family_id, paid)| {
                **paid > 0.0 && evaluation.participants.contains(family_id)
            })
            .map(|(_, paid)| (paid / unit_price).floor() as u64)
            .sum();
        let remaining = (total_units.min(units_paid) as f64 - units_issued).max(0.0);

        Some(Self {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            status: goal.status,
            unit_price: round_money(unit_price),
            total_units,
            units_paid,
            units_issued,
            remaining,
        })
    }
}

/// Issue Status Report
#[derive(Debug, Clone)]
pub struct IssueStatusReport {
    /// Hand-out goals of every status, in snapshot order
    pub rows: Vec<IssueStatusRow>,
}

impl IssueStatusReport {
    pub fn generate(engine: &AccrualEngine<'_>) -> Self {
        let snapshot = engine.snapshot();
        let issued = issued_units_by_goal(&snapshot.issues);

        let rows = snapshot
            .goals
            .iter()
            .filter(|goal| !goal.id.is_empty() && goal.issue_to_children)
            .filter_map(|goal| {
                let units_issued = issued.get(&goal.id).copied().unwrap_or(0.0);
                IssueStatusRow::from_evaluation(&engine.evaluate(goal), units_issued)
            })
            .collect();

        Self { rows }
    }

    /// Units paid for but not yet handed out, over all goals
    pub fn total_remaining(&self) -> f64 {
        self.rows.iter().map(|row| row.remaining).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();
        output.push_str("Issue Status\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No goals hand out units.\n");
            return output;
        }

        output.push_str(&issue_status_table(&self.rows, currency_symbol));
        output.push('\n');
        output.push_str(&format!("Units waiting: {}\n", self.total_remaining()));
        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FundsResult<()> {
        export_rows_csv(&self.rows, writer)
    }
}
