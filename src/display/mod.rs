//! Display formatting for terminal output
//!
//! Tables for reports and plain-text views of single-entity diagnostics.

pub mod explain;
pub mod tables;

pub use explain::{format_explanation, format_member, format_participants};
pub use tables::{
    balance_table, breakdown_table, detail_table, goal_summary_table, issue_status_table,
};
