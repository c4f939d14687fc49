//! Balance Report
//!
//! Whole-family balances: incoming, charged on closed goals, reserved on
//! open goals, free balance and debt.

use std::io::Write;

use crate::display::tables::balance_table;
use crate::error::FundsResult;
use crate::export::csv::export_rows_csv;
use crate::models::money::{format_amount, round_money};
use crate::models::FamilyId;
use crate::services::{AccrualEngine, FamilyBalance};

/// Balance Report
#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub rows: Vec<FamilyBalance>,
    pub total_incoming: f64,
    pub total_debt: f64,
}

impl BalanceReport {
    /// Generate balances for one family or everyone
    pub fn generate(engine: &AccrualEngine<'_>, family: Option<&FamilyId>) -> Self {
        let rows = engine.balances(family);
        let total_incoming = round_money(rows.iter().map(|r| r.incoming).sum());
        let total_debt = round_money(rows.iter().map(|r| r.debt).sum());

        Self {
            rows,
            total_incoming,
            total_debt,
        }
    }

    /// Families with a debt
    pub fn debtors(&self) -> impl Iterator<Item = &FamilyBalance> {
        self.rows.iter().filter(|r| r.debt > 0.0)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();
        output.push_str("Family Balances\n");
        output.push_str(&"=".repeat(70));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No families found.\n");
            return output;
        }

        output.push_str(&balance_table(&self.rows, currency_symbol));
        output.push('\n');
        output.push_str(&format!(
            "Incoming: {}  Debt: {} ({} families)\n",
            format_amount(self.total_incoming, currency_symbol),
            format_amount(self.total_debt, currency_symbol),
            self.debtors().count(),
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FundsResult<()> {
        export_rows_csv(&self.rows, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccrualMode, Family, Goal, GoalStatus, Payment, Snapshot};
    use crate::services::ModeAliases;

    fn snapshot() -> Snapshot {
        Snapshot {
            families: vec![Family::new("F1", "Anna"), Family::new("F2", "Boris")],
            goals: vec![
                Goal::new("G1", AccrualMode::StaticPerFamily, 100.0).with_status(GoalStatus::Closed),
                Goal::new("G2", AccrualMode::StaticPerFamily, 50.0),
            ],
            participation: vec![],
            payments: vec![
                Payment::to_goal("F1", "G1", 100.0),
                Payment::free("F1", 80.0),
                // payment from a family missing in the families list
                Payment::free("F9", 10.0),
            ],
            issues: Vec::new(),
        }
    }

    #[test]
    fn test_generate_all() {
        let snapshot = snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        let report = BalanceReport::generate(&engine, None);
        let ids: Vec<&str> = report.rows.iter().map(|r| r.family_id.as_str()).collect();
        assert_eq!(ids, vec!["F1", "F2", "F9"]);

        let f1 = &report.rows[0];
        assert_eq!(f1.incoming, 180.0);
        assert_eq!(f1.charged, 100.0);
        assert_eq!(f1.reserved, 50.0);
        assert_eq!(f1.free_balance, 30.0);

        let f2 = &report.rows[1];
        assert_eq!(f2.debt, 150.0);

        assert_eq!(report.total_incoming, 190.0);
        assert_eq!(report.debtors().count(), 1);
    }

    #[test]
    fn test_single_family() {
        let snapshot = snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        let report = BalanceReport::generate(&engine, Some(&FamilyId::from("F2")));
        assert_eq!(report.rows.len(), 1);
        assert!(report.format_terminal("$").contains("Family Balances"));
    }
}
