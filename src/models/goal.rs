//! Goal model
//!
//! A goal is a collection target with an accrual mode. Goals start Open and
//! end either Closed (freezing the dynamic cap) or Cancelled. Cancelled goals
//! never take part in any computation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::{amount_or_zero, is_positive_amount};
use super::period::{deserialize_lenient_date, DateSpan};
use crate::error::{FundsError, FundsResult};

/// Allocation rule deciding how much each family owes for a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualMode {
    /// Flat charge of T per participating family
    StaticPerFamily,
    /// T split evenly across all participants
    SharedTotalAll,
    /// T split evenly across participants who paid anything
    SharedTotalByPayers,
    /// Each payer charged up to the water-filling cap
    DynamicByPayers,
    /// Lesser of T and total collected, split pro rata to payments
    ProportionalByPayers,
    /// Whole units at a fixed unit price
    UnitPrice,
    /// Never charged; payments stay as free balance
    Voluntary,
    /// Same split as `SharedTotalAll`, drawn from standing balance
    FromBalance,
}

impl AccrualMode {
    /// All modes in declaration order
    pub const ALL: [AccrualMode; 8] = [
        Self::StaticPerFamily,
        Self::SharedTotalAll,
        Self::SharedTotalByPayers,
        Self::DynamicByPayers,
        Self::ProportionalByPayers,
        Self::UnitPrice,
        Self::Voluntary,
        Self::FromBalance,
    ];

    /// Canonical name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StaticPerFamily => "static_per_family",
            Self::SharedTotalAll => "shared_total_all",
            Self::SharedTotalByPayers => "shared_total_by_payers",
            Self::DynamicByPayers => "dynamic_by_payers",
            Self::ProportionalByPayers => "proportional_by_payers",
            Self::UnitPrice => "unit_price",
            Self::Voluntary => "voluntary",
            Self::FromBalance => "from_balance",
        }
    }

    /// Parse a canonical mode name (no alias handling)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|mode| mode.as_str() == s)
    }
}

impl fmt::Display for AccrualMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Open,
    Closed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Closed and Cancelled are terminal
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which goals a computation covers
///
/// Cancelled goals are excluded under every filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StatusFilter {
    /// Parse a filter name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Check whether a goal with `status` falls in this scope
    pub fn includes(&self, status: GoalStatus) -> bool {
        match (self, status) {
            (_, GoalStatus::Cancelled) => false,
            (Self::All, _) => true,
            (Self::Open, GoalStatus::Open) => true,
            (Self::Closed, GoalStatus::Closed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid status filter '{}': use open, closed or all", s))
    }
}

/// A collection goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    #[serde(default)]
    pub name: String,

    /// Mode name as stored by the host; may be a legacy alias or a typo
    pub accrual_mode: String,

    /// Target amount T
    #[serde(default)]
    pub target_amount: f64,

    /// Frozen dynamic cap for closed goals, or the unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_cap: Option<f64>,

    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,

    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub status: GoalStatus,

    /// Bought units are handed out to the children and tracked per goal
    #[serde(default, skip_serializing_if = "is_false")]
    pub issue_to_children: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Goal {
    /// Create an open goal without dates or a fixed cap
    pub fn new(id: impl Into<GoalId>, mode: AccrualMode, target_amount: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            accrual_mode: mode.as_str().to_string(),
            target_amount,
            fixed_cap: None,
            start_date: None,
            deadline: None,
            status: GoalStatus::Open,
            issue_to_children: false,
        }
    }

    /// Builder: set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set the fixed cap / unit price
    pub fn with_fixed_cap(mut self, cap: f64) -> Self {
        self.fixed_cap = Some(cap);
        self
    }

    /// Builder: set the active interval
    pub fn with_period(mut self, start: Option<NaiveDate>, deadline: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.deadline = deadline;
        self
    }

    /// Builder: mark the goal's units as handed out to the children
    pub fn with_issue_to_children(mut self, issue: bool) -> Self {
        self.issue_to_children = issue;
        self
    }

    /// Builder: set the status
    pub fn with_status(mut self, status: GoalStatus) -> Self {
        self.status = status;
        self
    }

    /// Target amount with invalid values treated as zero
    pub fn target(&self) -> f64 {
        amount_or_zero(self.target_amount)
    }

    /// Fixed cap if set to a positive finite value
    pub fn effective_fixed_cap(&self) -> Option<f64> {
        self.fixed_cap.filter(|cap| is_positive_amount(*cap))
    }

    /// The goal's active interval
    pub fn period(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.deadline)
    }

    pub fn is_open(&self) -> bool {
        self.status == GoalStatus::Open
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == GoalStatus::Cancelled
    }

    /// Close the goal, freezing `frozen_cap` when given
    pub fn close(&self, frozen_cap: Option<f64>) -> FundsResult<Goal> {
        self.transition(GoalStatus::Closed)?;
        let mut closed = self.clone();
        closed.status = GoalStatus::Closed;
        if let Some(cap) = frozen_cap {
            closed.fixed_cap = Some(cap);
        }
        Ok(closed)
    }

    /// Cancel the goal
    pub fn cancel(&self) -> FundsResult<Goal> {
        self.transition(GoalStatus::Cancelled)?;
        let mut cancelled = self.clone();
        cancelled.status = GoalStatus::Cancelled;
        Ok(cancelled)
    }

    fn transition(&self, to: GoalStatus) -> FundsResult<()> {
        if self.status.is_terminal() {
            return Err(FundsError::InvalidTransition {
                goal_id: self.id.to_string(),
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }
}
