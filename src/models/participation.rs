//! Participation records
//!
//! Explicit per-(goal, family) participation overrides. A goal without any
//! record uses default participation (active members).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ids::{FamilyId, GoalId};

/// Explicit participation status for one (goal, family) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    Participates,
    NotParticipates,
}

/// One participation row from the host data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub goal_id: GoalId,
    pub family_id: FamilyId,
    pub status: ParticipationStatus,
}

impl ParticipationRecord {
    pub fn new(
        goal_id: impl Into<GoalId>,
        family_id: impl Into<FamilyId>,
        status: ParticipationStatus,
    ) -> Self {
        Self {
            goal_id: goal_id.into(),
            family_id: family_id.into(),
            status,
        }
    }
}

/// Include/exclude sets for a single goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipationBucket {
    pub include: BTreeSet<FamilyId>,
    pub exclude: BTreeSet<FamilyId>,
}

impl ParticipationBucket {
    /// Whether any family was explicitly included
    pub fn has_include(&self) -> bool {
        !self.include.is_empty()
    }
}

/// Participation buckets keyed by goal
#[derive(Debug, Clone, Default)]
pub struct ParticipationIndex {
    buckets: BTreeMap<GoalId, ParticipationBucket>,
}

impl ParticipationIndex {
    /// Group records into per-goal buckets, skipping rows with blank IDs
    pub fn from_records(records: &[ParticipationRecord]) -> Self {
        let mut buckets: BTreeMap<GoalId, ParticipationBucket> = BTreeMap::new();

        for record in records {
            if record.goal_id.is_empty() || record.family_id.is_empty() {
                continue;
            }
            let bucket = buckets.entry(record.goal_id.clone()).or_default();
            match record.status {
                ParticipationStatus::Participates => {
                    bucket.include.insert(record.family_id.clone());
                }
                ParticipationStatus::NotParticipates => {
                    bucket.exclude.insert(record.family_id.clone());
                }
            }
        }

        Self { buckets }
    }

    /// Bucket for a goal, if any record exists
    pub fn bucket(&self, goal_id: &GoalId) -> Option<&ParticipationBucket> {
        self.buckets.get(goal_id)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
