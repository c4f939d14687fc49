//! Participant resolution
//!
//! Resolution happens in two explicit stages: the declared set comes from
//! participation records, the active flag and membership overlap; the payer
//! fallback then fills an empty declared set with everyone who paid.

use std::collections::BTreeSet;
use tracing::warn;

use crate::models::{Family, FamilyId, Goal, GoalPayments, ParticipationBucket};

/// Final participant set of a goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    pub families: BTreeSet<FamilyId>,
    /// True when the declared set was empty and payers were used instead
    pub from_fallback: bool,
}

impl Participants {
    pub fn contains(&self, family_id: &FamilyId) -> bool {
        self.families.contains(family_id)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FamilyId> {
        self.families.iter()
    }
}

/// Stage one: participants as declared by records and membership
///
/// With explicit includes, only included families whose membership overlaps
/// the goal period qualify. Without them, every active member qualifies.
/// Excluded families are removed in both cases. The result only holds IDs of
/// known families.
pub fn resolve_declared_participants(
    goal: &Goal,
    families: &[Family],
    bucket: Option<&ParticipationBucket>,
) -> BTreeSet<FamilyId> {
    let period = goal.period();
    let has_include = bucket.map(|b| b.has_include()).unwrap_or(false);

    let mut resolved: BTreeSet<FamilyId> = families
        .iter()
        .filter(|family| !family.id.is_empty())
        .filter(|family| match bucket {
            Some(b) if has_include => b.include.contains(&family.id),
            _ => family.active,
        })
        .filter(|family| family.is_member_in_period(&period))
        .map(|family| family.id.clone())
        .collect();

    if let Some(b) = bucket {
        for excluded in &b.exclude {
            resolved.remove(excluded);
        }
    }

    resolved
}

/// Stage two: fall back to payers when nobody was declared
pub fn with_payer_fallback(
    goal: &Goal,
    declared: BTreeSet<FamilyId>,
    payments: &GoalPayments,
) -> Participants {
    if !declared.is_empty() {
        return Participants {
            families: declared,
            from_fallback: false,
        };
    }

    let payers: BTreeSet<FamilyId> = payments
        .iter()
        .filter(|(_, paid)| **paid > 0.0)
        .map(|(family_id, _)| family_id.clone())
        .collect();

    if !payers.is_empty() {
        warn!(
            goal = %goal.id,
            payers = payers.len(),
            "No declared participants, falling back to payers"
        );
    }

    Participants {
        families: payers,
        from_fallback: true,
    }
}

/// Both stages in sequence
pub fn resolve_participants(
    goal: &Goal,
    families: &[Family],
    bucket: Option<&ParticipationBucket>,
    payments: &GoalPayments,
) -> Participants {
    let declared = resolve_declared_participants(goal, families, bucket);
    with_payer_fallback(goal, declared, payments)
}
