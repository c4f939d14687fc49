//! Unit hand-out records
//!
//! For goals that buy items to hand out to the children, each record notes
//! how many units went out and whether the hand-out actually happened.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::GoalId;
use super::money::is_positive_amount;

/// One hand-out row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub goal_id: GoalId,

    #[serde(default)]
    pub units: f64,

    /// Only issued rows count toward handed-out units
    #[serde(default)]
    pub issued: bool,
}

impl IssueRecord {
    pub fn new(goal_id: impl Into<GoalId>, units: f64, issued: bool) -> Self {
        Self {
            goal_id: goal_id.into(),
            units,
            issued,
        }
    }
}

/// Units handed out per goal
///
/// Pending rows, blank goals and non-positive unit counts are skipped.
pub fn issued_units_by_goal(records: &[IssueRecord]) -> BTreeMap<GoalId, f64> {
    let mut issued = BTreeMap::new();
    for record in records {
        if !record.issued || record.goal_id.is_empty() || !is_positive_amount(record.units) {
            continue;
        }
        *issued.entry(record.goal_id.clone()).or_insert(0.0) += record.units;
    }
    issued
}
