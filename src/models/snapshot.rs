//! Immutable input snapshot
//!
//! The read-only collections the engine computes over. Hosts refresh a
//! snapshot from their store and hand it to the engine as a whole.

use serde::{Deserialize, Serialize};

use super::family::Family;
use super::goal::Goal;
use super::ids::{FamilyId, GoalId};
use super::issue::IssueRecord;
use super::participation::ParticipationRecord;
use super::payment::Payment;

/// Families, goals, participation records, payments and hand-outs at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub participation: Vec<ParticipationRecord>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
}

impl Snapshot {
    /// Find a family by ID
    pub fn family(&self, id: &FamilyId) -> Option<&Family> {
        self.families.iter().find(|f| &f.id == id)
    }

    /// Find a goal by ID
    pub fn goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| &g.id == id)
    }

    /// Replace a goal by ID, returning whether it existed
    pub fn replace_goal(&mut self, goal: Goal) -> bool {
        match self.goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => {
                *existing = goal;
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty() && self.goals.is_empty() && self.payments.is_empty()
    }
}
