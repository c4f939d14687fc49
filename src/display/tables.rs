//! Table rendering for reports
//!
//! Each table has a row struct of preformatted strings so amounts, empty
//! goals and unknown estimates render consistently.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::format_amount;
use crate::reports::{GoalSummary, IssueStatusRow};
use crate::services::{BreakdownEntry, DetailRow, FamilyBalance};

#[derive(Tabled)]
struct DetailLine {
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Accrued")]
    accrued: String,
    #[tabled(rename = "Difference")]
    difference: String,
}

#[derive(Tabled)]
struct BalanceLine {
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Incoming")]
    incoming: String,
    #[tabled(rename = "Charged")]
    charged: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Reserved")]
    reserved: String,
    #[tabled(rename = "Free")]
    free_balance: String,
    #[tabled(rename = "Debt")]
    debt: String,
}

#[derive(Tabled)]
struct GoalLine {
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Collected")]
    collected: String,
    #[tabled(rename = "Participants")]
    participants: u64,
    #[tabled(rename = "Payers")]
    payers: u64,
    #[tabled(rename = "Units")]
    units: String,
    #[tabled(rename = "Need")]
    need: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Overpaid")]
    overpaid: String,
}

#[derive(Tabled)]
struct IssueLine {
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Unit price")]
    unit_price: String,
    #[tabled(rename = "Units")]
    total_units: u64,
    #[tabled(rename = "Paid")]
    units_paid: u64,
    #[tabled(rename = "Issued")]
    units_issued: f64,
    #[tabled(rename = "Remaining")]
    remaining: f64,
}

#[derive(Tabled)]
struct BreakdownLine {
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Accrued")]
    accrued: String,
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Detail rows as a table
pub fn detail_table(rows: &[DetailRow], symbol: &str) -> String {
    let lines: Vec<DetailLine> = rows
        .iter()
        .map(|row| DetailLine {
            family: row.family_id.to_string(),
            goal: optional(row.goal_id.as_ref()),
            mode: row.mode.clone(),
            paid: format_amount(row.paid, symbol),
            accrued: format_amount(row.accrued, symbol),
            difference: format_amount(row.difference, symbol),
        })
        .collect();

    Table::new(lines)
        .with(Style::psql())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string()
}

/// Family balances as a table
pub fn balance_table(rows: &[FamilyBalance], symbol: &str) -> String {
    let lines: Vec<BalanceLine> = rows
        .iter()
        .map(|row| BalanceLine {
            family: row.family_id.to_string(),
            incoming: format_amount(row.incoming, symbol),
            charged: format_amount(row.charged, symbol),
            balance: format_amount(row.balance, symbol),
            reserved: format_amount(row.reserved, symbol),
            free_balance: format_amount(row.free_balance, symbol),
            debt: format_amount(row.debt, symbol),
        })
        .collect();

    Table::new(lines)
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Goal summaries as a table
pub fn goal_summary_table(goals: &[&GoalSummary], symbol: &str) -> String {
    let lines: Vec<GoalLine> = goals
        .iter()
        .map(|goal| GoalLine {
            goal: goal.goal_id.to_string(),
            name: goal.name.clone(),
            mode: goal.mode.clone(),
            target: format_amount(goal.target_total, symbol),
            collected: format_amount(goal.collected, symbol),
            participants: goal.participant_count,
            payers: goal.payer_count,
            units: optional(goal.units_paid),
            need: optional(goal.payers_needed),
            remaining: format_amount(goal.remaining, symbol),
            overpaid: format_amount(goal.overpaid, symbol),
        })
        .collect();

    Table::new(lines).with(Style::psql()).to_string()
}

/// Unit hand-out state per goal as a table
pub fn issue_status_table(rows: &[IssueStatusRow], symbol: &str) -> String {
    let lines: Vec<IssueLine> = rows
        .iter()
        .map(|row| IssueLine {
            goal: row.goal_id.to_string(),
            name: row.name.clone(),
            status: row.status.to_string(),
            unit_price: format_amount(row.unit_price, symbol),
            total_units: row.total_units,
            units_paid: row.units_paid,
            units_issued: row.units_issued,
            remaining: row.remaining,
        })
        .collect();

    Table::new(lines)
        .with(Style::psql())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string()
}

/// Per-goal accruals of one family as a table
pub fn breakdown_table(entries: &[BreakdownEntry], symbol: &str) -> String {
    let lines: Vec<BreakdownLine> = entries
        .iter()
        .map(|entry| BreakdownLine {
            goal: entry.goal_id.to_string(),
            accrued: format_amount(entry.accrued, symbol),
        })
        .collect();

    Table::new(lines)
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()))
        .to_string()
}
