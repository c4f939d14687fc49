//! Detail Report
//!
//! One row per (family, goal) with something paid or accrued, followed by
//! free payments.

use std::io::Write;

use crate::display::tables::detail_table;
use crate::error::FundsResult;
use crate::export::csv::export_rows_csv;
use crate::models::money::{format_amount, round_money};
use crate::models::{FamilyId, StatusFilter};
use crate::services::{AccrualEngine, DetailRow};

/// Detail Report
#[derive(Debug, Clone)]
pub struct DetailReport {
    pub scope: StatusFilter,
    pub family: Option<FamilyId>,
    pub rows: Vec<DetailRow>,
    pub total_paid: f64,
    pub total_accrued: f64,
}

impl DetailReport {
    /// Generate a detail report
    pub fn generate(
        engine: &AccrualEngine<'_>,
        scope: StatusFilter,
        family: Option<&FamilyId>,
    ) -> Self {
        let rows = engine.detail_rows(scope, family);
        let total_paid = round_money(rows.iter().map(|r| r.paid).sum());
        let total_accrued = round_money(rows.iter().map(|r| r.accrued).sum());

        Self {
            scope,
            family: family.cloned(),
            rows,
            total_paid,
            total_accrued,
        }
    }

    pub fn total_difference(&self) -> f64 {
        round_money(self.total_paid - self.total_accrued)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        let title = match &self.family {
            Some(family) => format!("Detail: {} ({} goals)\n", family, self.scope),
            None => format!("Detail ({} goals)\n", self.scope),
        };
        output.push_str(&title);
        output.push_str(&"=".repeat(70));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("Nothing paid or accrued.\n");
            return output;
        }

        output.push_str(&detail_table(&self.rows, currency_symbol));
        output.push('\n');
        output.push_str(&format!(
            "Paid: {}  Accrued: {}  Difference: {}\n",
            format_amount(self.total_paid, currency_symbol),
            format_amount(self.total_accrued, currency_symbol),
            format_amount(self.total_difference(), currency_symbol),
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FundsResult<()> {
        export_rows_csv(&self.rows, writer)
    }
}
