//! Payments and per-(goal, family) totals
//!
//! The engine never needs individual payments, only their sums per goal and
//! family. Payments without a goal are free contributions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{FamilyId, GoalId};
use super::money::is_positive_amount;
use super::period::deserialize_lenient_date;

/// A single payment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub family_id: FamilyId,

    /// Goal the payment is made toward; `None` for a free payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<GoalId>,

    pub amount: f64,

    /// Informational only
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
}

impl Payment {
    /// Payment toward a goal
    pub fn to_goal(family_id: impl Into<FamilyId>, goal_id: impl Into<GoalId>, amount: f64) -> Self {
        Self {
            family_id: family_id.into(),
            goal_id: Some(goal_id.into()),
            amount,
            date: None,
            method: String::new(),
        }
    }

    /// Free payment, not tied to any goal
    pub fn free(family_id: impl Into<FamilyId>, amount: f64) -> Self {
        Self {
            family_id: family_id.into(),
            goal_id: None,
            amount,
            date: None,
            method: String::new(),
        }
    }

    /// The goal, treating a blank goal ID as none
    pub fn goal(&self) -> Option<&GoalId> {
        self.goal_id.as_ref().filter(|id| !id.is_empty())
    }
}

/// Summed payments for one goal, keyed by family
pub type GoalPayments = BTreeMap<FamilyId, f64>;

/// All payment totals of a snapshot
#[derive(Debug, Clone, Default)]
pub struct PaymentLedger {
    by_goal: BTreeMap<GoalId, GoalPayments>,
    free: BTreeMap<FamilyId, f64>,
    empty: GoalPayments,
}

impl PaymentLedger {
    /// Sum payments per (goal, family), dropping unusable rows
    ///
    /// Rows with a blank family or a non-positive / non-finite amount are
    /// ignored.
    pub fn from_payments(payments: &[Payment]) -> Self {
        let mut ledger = Self::default();

        for payment in payments {
            if payment.family_id.is_empty() || !is_positive_amount(payment.amount) {
                continue;
            }
            let family = payment.family_id.clone();
            match payment.goal() {
                Some(goal_id) => {
                    *ledger
                        .by_goal
                        .entry(goal_id.clone())
                        .or_default()
                        .entry(family)
                        .or_insert(0.0) += payment.amount;
                }
                None => {
                    *ledger.free.entry(family).or_insert(0.0) += payment.amount;
                }
            }
        }

        ledger
    }

    /// Totals for a goal; empty when nobody paid
    pub fn for_goal(&self, goal_id: &GoalId) -> &GoalPayments {
        self.by_goal.get(goal_id).unwrap_or(&self.empty)
    }

    /// What a family paid toward a goal
    pub fn paid(&self, goal_id: &GoalId, family_id: &FamilyId) -> f64 {
        self.for_goal(goal_id).get(family_id).copied().unwrap_or(0.0)
    }

    /// Free (goal-less) payments by a family
    pub fn free_paid(&self, family_id: &FamilyId) -> f64 {
        self.free.get(family_id).copied().unwrap_or(0.0)
    }

    /// All free payment totals
    pub fn free_payments(&self) -> &BTreeMap<FamilyId, f64> {
        &self.free
    }

    /// Every payment by a family, goal-bound or free
    pub fn total_paid(&self, family_id: &FamilyId) -> f64 {
        let goal_bound: f64 = self
            .by_goal
            .values()
            .filter_map(|payments| payments.get(family_id))
            .sum();
        goal_bound + self.free_paid(family_id)
    }

    /// Families with any payment in the ledger
    pub fn families(&self) -> impl Iterator<Item = &FamilyId> {
        self.by_goal
            .values()
            .flat_map(|payments| payments.keys())
            .chain(self.free.keys())
    }
}
