//! Accrual engine
//!
//! Orchestrates participant resolution, precomputation and the accrual
//! calculator over a snapshot. Every operation is a pure function of the
//! snapshot and the alias table: unknown references resolve to zero or an
//! empty result instead of an error.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

use super::accrual::accrue;
use super::aliases::ModeAliases;
use super::participants::{resolve_participants, Participants};
use super::precompute::{precompute, GoalInputs};
use crate::models::money::round_money;
use crate::models::{
    AccrualMode, FamilyId, Goal, GoalId, GoalPayments, GoalStatus, ParticipationIndex,
    PaymentLedger, Snapshot, StatusFilter,
};

/// Mode label used for free-payment detail rows
pub const FREE_MODE: &str = "free";

/// Engine over one immutable snapshot
pub struct AccrualEngine<'a> {
    snapshot: &'a Snapshot,
    aliases: &'a ModeAliases,
    ledger: PaymentLedger,
    participation: ParticipationIndex,
}

/// Everything needed to accrue any family for one goal
#[derive(Debug, Clone)]
pub struct GoalEvaluation<'a> {
    pub goal: &'a Goal,
    /// `None` when the stored mode name is unknown
    pub mode: Option<AccrualMode>,
    pub participants: Participants,
    pub inputs: GoalInputs,
    pub payments: &'a GoalPayments,
}

impl GoalEvaluation<'_> {
    /// Unrounded accrual of one family
    pub fn accrued(&self, family_id: &FamilyId) -> f64 {
        match self.mode {
            Some(mode) => accrue(
                family_id,
                self.goal,
                mode,
                &self.participants,
                self.payments,
                self.inputs,
            ),
            None => 0.0,
        }
    }

    /// What one family paid toward the goal
    pub fn paid(&self, family_id: &FamilyId) -> f64 {
        self.payments.get(family_id).copied().unwrap_or(0.0)
    }

    /// Participants followed by payers who are not participants
    pub fn implicated_families(&self) -> BTreeSet<FamilyId> {
        let mut families = self.participants.families.clone();
        families.extend(
            self.payments
                .iter()
                .filter(|(_, paid)| **paid > 0.0)
                .map(|(id, _)| id.clone()),
        );
        families
    }

    /// Mode label for output rows
    pub fn mode_label(&self) -> String {
        match self.mode {
            Some(mode) => mode.to_string(),
            None => self.goal.accrual_mode.trim().to_string(),
        }
    }

    /// Sum paid by participants
    pub fn collected(&self) -> f64 {
        self.participants.iter().map(|id| self.paid(id)).sum()
    }

    /// Participants with a positive payment
    pub fn payer_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|id| self.paid(id) > 0.0)
            .count()
    }
}

/// One goal's accrual within a family breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub goal_id: GoalId,
    pub accrued: f64,
}

/// One detail row; `goal_id` is `None` for free payments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub family_id: FamilyId,
    pub goal_id: Option<GoalId>,
    pub paid: f64,
    pub accrued: f64,
    pub difference: f64,
    pub mode: String,
}

/// Whole-family balance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyBalance {
    pub family_id: FamilyId,
    /// Every payment, goal-bound or free
    pub incoming: f64,
    /// Accrued on closed goals
    pub charged: f64,
    /// Accrued on open goals
    pub reserved: f64,
    pub balance: f64,
    pub free_balance: f64,
    pub debt: f64,
}

/// Diagnostics for one (goal, family) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub goal_id: GoalId,
    pub family_id: FamilyId,
    pub mode: String,
    pub mode_known: bool,
    pub status: GoalStatus,
    pub target: f64,
    pub fixed_cap: Option<f64>,
    pub participant_count: usize,
    pub from_fallback: bool,
    pub is_participant: bool,
    pub payer_count: usize,
    pub cap: f64,
    pub goal_payments: Vec<(FamilyId, f64)>,
    pub family_paid: f64,
    pub family_accrued: f64,
}

impl<'a> AccrualEngine<'a> {
    /// Create an engine; payment totals and participation buckets are built once
    pub fn new(snapshot: &'a Snapshot, aliases: &'a ModeAliases) -> Self {
        Self {
            snapshot,
            aliases,
            ledger: PaymentLedger::from_payments(&snapshot.payments),
            participation: ParticipationIndex::from_records(&snapshot.participation),
        }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    /// Goals covered by `filter`, in snapshot order
    pub fn goals_in_scope(&self, filter: StatusFilter) -> Vec<&'a Goal> {
        self.snapshot
            .goals
            .iter()
            .filter(|goal| !goal.id.is_empty() && filter.includes(goal.status))
            .collect()
    }

    /// Resolve participants and goal-wide inputs for a goal
    pub fn evaluate(&self, goal: &'a Goal) -> GoalEvaluation<'_> {
        let payments = self.ledger.for_goal(&goal.id);
        let mode = self.aliases.resolve(&goal.accrual_mode);
        if mode.is_none() {
            warn!(
                goal = %goal.id,
                mode = %goal.accrual_mode,
                "Unknown accrual mode, goal accrues nothing"
            );
        }

        let participants = resolve_participants(
            goal,
            &self.snapshot.families,
            self.participation.bucket(&goal.id),
            payments,
        );
        let inputs = match mode {
            Some(mode) => precompute(goal, mode, &participants, payments),
            None => GoalInputs::default(),
        };

        GoalEvaluation {
            goal,
            mode,
            participants,
            inputs,
            payments,
        }
    }

    fn evaluate_scope(&self, filter: StatusFilter) -> Vec<GoalEvaluation<'_>> {
        let goals = self.goals_in_scope(filter);
        info!(scope = %filter, goals = goals.len(), "Evaluating goals");
        goals.into_iter().map(|goal| self.evaluate(goal)).collect()
    }

    fn find_goal(&self, goal_id: &GoalId) -> Option<&'a Goal> {
        self.snapshot
            .goal(goal_id)
            .filter(|goal| !goal.is_cancelled())
    }

    /// Total accrual of a family over the goals in scope
    pub fn compute_accrual(&self, family_id: &FamilyId, filter: StatusFilter) -> f64 {
        if family_id.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .evaluate_scope(filter)
            .iter()
            .map(|evaluation| evaluation.accrued(family_id))
            .sum();
        round_money(total)
    }

    /// Per-goal accruals of a family, skipping goals with nothing accrued
    pub fn compute_breakdown(&self, family_id: &FamilyId, filter: StatusFilter) -> Vec<BreakdownEntry> {
        if family_id.is_empty() {
            return Vec::new();
        }
        self.evaluate_scope(filter)
            .iter()
            .filter_map(|evaluation| {
                let accrued = evaluation.accrued(family_id);
                (accrued != 0.0).then(|| BreakdownEntry {
                    goal_id: evaluation.goal.id.clone(),
                    accrued: round_money(accrued),
                })
            })
            .collect()
    }

    /// Detail rows for goals in scope, then free payments
    ///
    /// A row is emitted only when something was paid or accrued.
    pub fn detail_rows(&self, filter: StatusFilter, family: Option<&FamilyId>) -> Vec<DetailRow> {
        let wanted = |id: &FamilyId| family.map_or(true, |f| f == id);
        let mut rows = Vec::new();

        for evaluation in self.evaluate_scope(filter) {
            let mode = evaluation.mode_label();
            for family_id in evaluation.implicated_families() {
                if !wanted(&family_id) {
                    continue;
                }
                let paid = evaluation.paid(&family_id);
                let accrued = evaluation.accrued(&family_id);
                if paid <= 0.0 && accrued <= 0.0 {
                    continue;
                }
                rows.push(DetailRow {
                    family_id,
                    goal_id: Some(evaluation.goal.id.clone()),
                    paid: round_money(paid),
                    accrued: round_money(accrued),
                    difference: round_money(paid - accrued),
                    mode: mode.clone(),
                });
            }
        }

        for (family_id, paid) in self.ledger.free_payments() {
            if !wanted(family_id) {
                continue;
            }
            rows.push(DetailRow {
                family_id: family_id.clone(),
                goal_id: None,
                paid: round_money(*paid),
                accrued: 0.0,
                difference: round_money(*paid),
                mode: FREE_MODE.to_string(),
            });
        }

        rows
    }

    /// Everything a family ever paid
    pub fn paid_total(&self, family_id: &FamilyId) -> f64 {
        round_money(self.ledger.total_paid(family_id))
    }

    /// Payments not tied to a goal
    pub fn free_payments(&self, family_id: &FamilyId) -> f64 {
        round_money(self.ledger.free_paid(family_id))
    }

    pub fn paid_to_goal(&self, family_id: &FamilyId, goal_id: &GoalId) -> f64 {
        round_money(self.ledger.paid(goal_id, family_id))
    }

    /// Accrual for one goal regardless of its status (cancelled goals accrue 0)
    pub fn accrued_for_goal(&self, family_id: &FamilyId, goal_id: &GoalId) -> f64 {
        match self.find_goal(goal_id) {
            Some(goal) => round_money(self.evaluate(goal).accrued(family_id)),
            None => 0.0,
        }
    }

    pub fn balance_for_goal(&self, family_id: &FamilyId, goal_id: &GoalId) -> f64 {
        round_money(self.paid_to_goal(family_id, goal_id) - self.accrued_for_goal(family_id, goal_id))
    }

    /// Aggregate balance of a family across all goals
    pub fn family_balance(&self, family_id: &FamilyId) -> FamilyBalance {
        let evaluations = self.evaluate_scope(StatusFilter::All);
        self.balance_from(family_id, &evaluations)
    }

    /// Balances of every known family plus anyone who paid
    pub fn balances(&self, family: Option<&FamilyId>) -> Vec<FamilyBalance> {
        let evaluations = self.evaluate_scope(StatusFilter::All);
        let ids: BTreeSet<FamilyId> = match family {
            Some(id) => std::iter::once(id.clone()).collect(),
            None => self
                .snapshot
                .families
                .iter()
                .map(|f| f.id.clone())
                .chain(self.ledger.families().cloned())
                .filter(|id| !id.is_empty())
                .collect(),
        };
        ids.iter()
            .map(|id| self.balance_from(id, &evaluations))
            .collect()
    }

    fn balance_from(&self, family_id: &FamilyId, evaluations: &[GoalEvaluation<'_>]) -> FamilyBalance {
        let mut charged = 0.0;
        let mut reserved = 0.0;
        for evaluation in evaluations {
            let accrued = evaluation.accrued(family_id);
            match evaluation.goal.status {
                GoalStatus::Closed => charged += accrued,
                GoalStatus::Open => reserved += accrued,
                GoalStatus::Cancelled => {}
            }
        }

        let incoming = self.paid_total(family_id);
        let charged = round_money(charged);
        let reserved = round_money(reserved);
        let balance = round_money(incoming - charged);
        let free_balance = round_money(balance - reserved);
        let debt = round_money((-free_balance).max(0.0));

        FamilyBalance {
            family_id: family_id.clone(),
            incoming,
            charged,
            reserved,
            balance,
            free_balance,
            debt,
        }
    }

    /// Balance to settle when a family leaves
    ///
    /// For a family with an end of membership, only goals whose period
    /// overlaps the membership are charged, open or closed. Otherwise this is
    /// the regular balance.
    pub fn exit_balance(&self, family_id: &FamilyId) -> f64 {
        let Some(family) = self.snapshot.family(family_id).filter(|f| f.has_left()) else {
            return self.family_balance(family_id).balance;
        };

        let accrued: f64 = self
            .evaluate_scope(StatusFilter::All)
            .iter()
            .filter(|evaluation| family.is_member_in_period(&evaluation.goal.period()))
            .map(|evaluation| evaluation.accrued(family_id))
            .sum();

        round_money(self.paid_total(family_id) - accrued)
    }

    /// Resolved participants of a goal; `None` for unknown or cancelled goals
    pub fn participants(&self, goal_id: &GoalId) -> Option<Participants> {
        self.find_goal(goal_id)
            .map(|goal| self.evaluate(goal).participants)
    }

    /// The dynamic cap to freeze when a goal is closed
    ///
    /// `None` for goals that are not in dynamic mode or do not exist.
    pub fn freeze_cap(&self, goal_id: &GoalId) -> Option<f64> {
        let goal = self.find_goal(goal_id)?;
        let evaluation = self.evaluate(goal);
        match evaluation.mode {
            Some(AccrualMode::DynamicByPayers) => Some(evaluation.inputs.cap),
            _ => None,
        }
    }

    /// Diagnostics for a (goal, family) pair
    pub fn explain(&self, goal_id: &GoalId, family_id: &FamilyId) -> Option<Explanation> {
        let goal = self.find_goal(goal_id)?;
        let evaluation = self.evaluate(goal);

        Some(Explanation {
            goal_id: goal.id.clone(),
            family_id: family_id.clone(),
            mode: evaluation.mode_label(),
            mode_known: evaluation.mode.is_some(),
            status: goal.status,
            target: goal.target(),
            fixed_cap: goal.effective_fixed_cap(),
            participant_count: evaluation.participants.len(),
            from_fallback: evaluation.participants.from_fallback,
            is_participant: evaluation.participants.contains(family_id),
            payer_count: evaluation.payer_count(),
            cap: evaluation.inputs.cap,
            goal_payments: evaluation
                .payments
                .iter()
                .map(|(id, paid)| (id.clone(), round_money(*paid)))
                .collect(),
            family_paid: round_money(evaluation.paid(family_id)),
            family_accrued: round_money(evaluation.accrued(family_id)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Family, ParticipationRecord, ParticipationStatus, Payment};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn f(id: &str) -> FamilyId {
        FamilyId::from(id)
    }

    fn g(id: &str) -> GoalId {
        GoalId::from(id)
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            families: vec![
                Family::new("F1", "Anna"),
                Family::new("F2", "Boris"),
                Family::new("F3", "Vera"),
            ],
            goals: vec![
                Goal::new("G1", AccrualMode::StaticPerFamily, 500.0),
                Goal::new("G2", AccrualMode::SharedTotalByPayers, 1000.0),
                Goal::new("G3", AccrualMode::SharedTotalAll, 300.0).with_status(GoalStatus::Closed),
                Goal::new("G4", AccrualMode::StaticPerFamily, 999.0)
                    .with_status(GoalStatus::Cancelled),
            ],
            participation: vec![],
            payments: vec![
                Payment::to_goal("F1", "G1", 500.0),
                Payment::to_goal("F2", "G1", 300.0),
                Payment::to_goal("F1", "G2", 700.0),
                Payment::to_goal("F2", "G2", 300.0),
                Payment::to_goal("F1", "G4", 50.0),
                Payment::free("F3", 40.0),
            ],
            issues: Vec::new(),
        }
    }

    #[test]
    fn test_compute_accrual_by_scope() {
        let snapshot = sample_snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        assert_eq!(engine.compute_accrual(&f("F1"), StatusFilter::Open), 1000.0);
        assert_eq!(engine.compute_accrual(&f("F3"), StatusFilter::Open), 500.0);
        assert_eq!(engine.compute_accrual(&f("F1"), StatusFilter::Closed), 100.0);
        assert_eq!(engine.compute_accrual(&f("F1"), StatusFilter::All), 1100.0);
        assert_eq!(engine.compute_accrual(&f("F9"), StatusFilter::All), 0.0);
        assert_eq!(engine.compute_accrual(&f(""), StatusFilter::All), 0.0);
    }

    #[test]
    fn test_breakdown_skips_zero_entries() {
        let snapshot = sample_snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        let breakdown = engine.compute_breakdown(&f("F3"), StatusFilter::All);
        let goals: Vec<&str> = breakdown.iter().map(|e| e.goal_id.as_str()).collect();
        assert_eq!(goals, vec!["G1", "G3"]);
        assert_eq!(breakdown[0].accrued, 500.0);
        assert_eq!(breakdown[1].accrued, 100.0);
    }

    #[test]
    fn test_family_balance() {
        let snapshot = sample_snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        let balance = engine.family_balance(&f("F2"));
        assert_eq!(balance.incoming, 600.0);
        assert_eq!(balance.charged, 100.0);
        assert_eq!(balance.reserved, 1000.0);
        assert_eq!(balance.balance, 500.0);
        assert_eq!(balance.free_balance, -500.0);
        assert_eq!(balance.debt, 500.0);

        // payments to cancelled goals still count as incoming
        let balance = engine.family_balance(&f("F1"));
        assert_eq!(balance.incoming, 1250.0);
        assert_eq!(balance.free_balance, 150.0);
        assert_eq!(balance.debt, 0.0);
    }

    #[test]
    fn test_detail_rows() {
        let snapshot = sample_snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        let rows = engine.detail_rows(StatusFilter::Open, Some(&f("F2")));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].goal_id, Some(g("G1")));
        assert_eq!(rows[0].difference, -200.0);
        assert_eq!(rows[1].mode, "shared_total_by_payers");

        // F3 owes G1 without paying; G2 is skipped (nothing paid or accrued)
        let rows = engine.detail_rows(StatusFilter::Open, Some(&f("F3")));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].goal_id, Some(g("G1")));
        assert_eq!(rows[1].goal_id, None);
        assert_eq!(rows[1].mode, FREE_MODE);
        assert_eq!(rows[1].difference, 40.0);
    }

    #[test]
    fn test_per_goal_operations() {
        let snapshot = sample_snapshot();
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        assert_eq!(engine.paid_to_goal(&f("F2"), &g("G2")), 300.0);
        assert_eq!(engine.accrued_for_goal(&f("F2"), &g("G2")), 500.0);
        assert_eq!(engine.balance_for_goal(&f("F2"), &g("G2")), -200.0);
        assert_eq!(engine.accrued_for_goal(&f("F1"), &g("G4")), 0.0);
        assert_eq!(engine.accrued_for_goal(&f("F1"), &g("G404")), 0.0);
        assert_eq!(engine.free_payments(&f("F3")), 40.0);
        assert_eq!(engine.paid_total(&f("F3")), 40.0);
    }

    #[test]
    fn test_unknown_mode_accrues_nothing() {
        let mut goal = Goal::new("G1", AccrualMode::StaticPerFamily, 500.0);
        goal.accrual_mode = "static_per_famliy".to_string();
        let snapshot = Snapshot {
            families: vec![Family::new("F1", "Anna")],
            goals: vec![goal],
            payments: vec![Payment::to_goal("F1", "G1", 100.0)],
            ..Default::default()
        };
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        assert_eq!(engine.compute_accrual(&f("F1"), StatusFilter::All), 0.0);
        let rows = engine.detail_rows(StatusFilter::All, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mode, "static_per_famliy");
        assert_eq!(rows[0].accrued, 0.0);
    }

    #[test]
    fn test_legacy_alias_resolves() {
        let mut goal = Goal::new("G1", AccrualMode::StaticPerFamily, 250.0);
        goal.accrual_mode = "static_per_child".to_string();
        let snapshot = Snapshot {
            families: vec![Family::new("F1", "Anna")],
            goals: vec![goal],
            ..Default::default()
        };
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);
        assert_eq!(engine.compute_accrual(&f("F1"), StatusFilter::Open), 250.0);

        let no_aliases = ModeAliases::empty();
        let engine = AccrualEngine::new(&snapshot, &no_aliases);
        assert_eq!(engine.compute_accrual(&f("F1"), StatusFilter::Open), 0.0);
    }

    #[test]
    fn test_payer_fallback_in_orchestration() {
        let snapshot = Snapshot {
            families: vec![Family::new("F1", "Anna").with_active(false)],
            goals: vec![Goal::new("G1", AccrualMode::SharedTotalAll, 300.0)],
            payments: vec![
                Payment::to_goal("F1", "G1", 100.0),
                Payment::to_goal("F2", "G1", 100.0),
            ],
            ..Default::default()
        };
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        let participants = engine.participants(&g("G1")).unwrap();
        assert!(participants.from_fallback);
        assert_eq!(participants.len(), 2);
        assert_eq!(engine.compute_accrual(&f("F2"), StatusFilter::Open), 150.0);
    }

    #[test]
    fn test_freeze_cap_and_explain() {
        let snapshot = Snapshot {
            families: vec![Family::new("F1", "A"), Family::new("F2", "B")],
            goals: vec![
                Goal::new("G1", AccrualMode::DynamicByPayers, 500.0),
                Goal::new("G2", AccrualMode::Voluntary, 0.0),
            ],
            participation: vec![],
            payments: vec![
                Payment::to_goal("F1", "G1", 2000.0),
                Payment::to_goal("F2", "G1", 1333.0),
            ],
            issues: Vec::new(),
        };
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        assert_eq!(engine.freeze_cap(&g("G1")), Some(250.0));
        assert_eq!(engine.freeze_cap(&g("G2")), None);

        let explanation = engine.explain(&g("G1"), &f("F2")).unwrap();
        assert_eq!(explanation.participant_count, 2);
        assert_eq!(explanation.payer_count, 2);
        assert_eq!(explanation.cap, 250.0);
        assert_eq!(explanation.family_paid, 1333.0);
        assert_eq!(explanation.family_accrued, 250.0);
        assert!(engine.explain(&g("G9"), &f("F1")).is_none());
    }

    #[test]
    fn test_exit_balance_only_counts_overlapping_goals() {
        let snapshot = Snapshot {
            families: vec![
                Family::new("F1", "Left").with_membership(None, Some(d(2024, 5, 31))),
                Family::new("F2", "Stays"),
            ],
            goals: vec![
                Goal::new("G1", AccrualMode::StaticPerFamily, 100.0)
                    .with_period(Some(d(2024, 1, 1)), Some(d(2024, 3, 31)))
                    .with_status(GoalStatus::Closed),
                Goal::new("G2", AccrualMode::StaticPerFamily, 200.0)
                    .with_period(Some(d(2024, 9, 1)), Some(d(2024, 12, 31))),
            ],
            participation: vec![ParticipationRecord::new(
                "G2",
                "F1",
                ParticipationStatus::Participates,
            )],
            payments: vec![Payment::free("F1", 500.0)],
            issues: Vec::new(),
        };
        let aliases = ModeAliases::default();
        let engine = AccrualEngine::new(&snapshot, &aliases);

        // G2 starts after F1 left, so F1 is not even a participant there
        assert_eq!(engine.exit_balance(&f("F1")), 400.0);
        assert_eq!(engine.exit_balance(&f("F2")), engine.family_balance(&f("F2")).balance);
    }
}
