//! JSON data directory store
//!
//! Each collection lives in its own file under `data/`. Missing files read
//! as empty collections.

use serde::{Deserialize, Serialize};

use super::file_io::{read_json, write_json_atomic};
use super::SnapshotProvider;
use crate::config::paths::FundsPaths;
use crate::error::{FundsError, FundsResult};
use crate::models::{
    Family, Goal, GoalId, IssueRecord, ParticipationRecord, Payment, Snapshot,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct FamilyData {
    #[serde(default)]
    pub families: Vec<Family>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct GoalData {
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ParticipationData {
    #[serde(default)]
    pub participation: Vec<ParticipationRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PaymentData {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct IssueData {
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
}

/// Snapshot provider backed by the JSON data directory
pub struct JsonSnapshotStore {
    paths: FundsPaths,
}

impl JsonSnapshotStore {
    pub fn new(paths: FundsPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &FundsPaths {
        &self.paths
    }

    /// Persist the goal collection
    pub fn save_goals(&self, goals: &[Goal]) -> FundsResult<()> {
        let data = GoalData {
            goals: goals.to_vec(),
        };
        write_json_atomic(self.paths.goals_file(), &data)
    }

    /// Replace one goal on disk
    pub fn update_goal(&self, goal: Goal) -> FundsResult<()> {
        let mut data: GoalData = read_json(self.paths.goals_file())?;
        let slot = data
            .goals
            .iter_mut()
            .find(|g| g.id == goal.id)
            .ok_or_else(|| FundsError::goal_not_found(goal.id.to_string()))?;
        *slot = goal;
        write_json_atomic(self.paths.goals_file(), &data)
    }

    /// Look up a goal without loading the other collections
    pub fn find_goal(&self, goal_id: &GoalId) -> FundsResult<Option<Goal>> {
        let data: GoalData = read_json(self.paths.goals_file())?;
        Ok(data.goals.into_iter().find(|g| &g.id == goal_id))
    }
}

impl SnapshotProvider for JsonSnapshotStore {
    fn load_snapshot(&self) -> FundsResult<Snapshot> {
        let families: FamilyData = read_json(self.paths.families_file())?;
        let goals: GoalData = read_json(self.paths.goals_file())?;
        let participation: ParticipationData = read_json(self.paths.participation_file())?;
        let payments: PaymentData = read_json(self.paths.payments_file())?;
        let issues: IssueData = read_json(self.paths.issues_file())?;

        Ok(Snapshot {
            families: families.families,
            goals: goals.goals,
            participation: participation.participation,
            payments: payments.payments,
            issues: issues.issues,
        })
    }
}
