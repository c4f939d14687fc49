//! Reports module for family-funds
//!
//! Detail rows per (family, goal), whole-family balances, per-goal
//! collection summaries and unit hand-out status.

pub mod balance;
pub mod detail;
pub mod goal_summary;
pub mod issue_status;

pub use balance::BalanceReport;
pub use detail::DetailReport;
pub use goal_summary::{GoalSummary, GoalSummaryReport};
pub use issue_status::{IssueStatusReport, IssueStatusRow};
