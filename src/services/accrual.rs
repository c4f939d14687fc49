//! Accrual calculator
//!
//! One exhaustive match over `AccrualMode`. The function is total: families
//! outside the participant set accrue nothing, and so does any goal whose
//! mode could not be resolved (handled by the caller).

use super::participants::Participants;
use super::precompute::{participant_payments, GoalInputs};
use crate::models::{AccrualMode, FamilyId, Goal, GoalPayments};

/// Amount `family_id` owes for `goal` under `mode`
pub fn accrue(
    family_id: &FamilyId,
    goal: &Goal,
    mode: AccrualMode,
    participants: &Participants,
    payments: &GoalPayments,
    inputs: GoalInputs,
) -> f64 {
    if !participants.contains(family_id) {
        return 0.0;
    }

    let target = goal.target();
    let paid = payments.get(family_id).copied().unwrap_or(0.0);
    let n = participants.len();

    match mode {
        AccrualMode::StaticPerFamily => target,
        AccrualMode::SharedTotalAll => even_split(target, n),
        AccrualMode::SharedTotalByPayers => {
            if paid > 0.0 && inputs.payer_count > 0 {
                target / inputs.payer_count as f64
            } else {
                0.0
            }
        }
        AccrualMode::DynamicByPayers => {
            if inputs.cap > 0.0 {
                paid.min(inputs.cap)
            } else {
                0.0
            }
        }
        AccrualMode::ProportionalByPayers => {
            let sum_paid: f64 = participant_payments(participants, payments).iter().sum();
            if sum_paid > 0.0 {
                paid * target.min(sum_paid) / sum_paid
            } else {
                0.0
            }
        }
        AccrualMode::UnitPrice => match goal.effective_fixed_cap() {
            Some(unit_price) => (paid / unit_price).floor() * unit_price,
            None => 0.0,
        },
        AccrualMode::Voluntary => 0.0,
        // Same arithmetic as SharedTotalAll; the amount is charged against
        // standing balance instead of fresh payments.
        AccrualMode::FromBalance => even_split(target, n),
    }
}

fn even_split(target: f64, n: usize) -> f64 {
    if n > 0 {
        target / n as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::precompute::precompute;

    fn participants(ids: &[&str]) -> Participants {
        Participants {
            families: ids.iter().map(|id| FamilyId::from(*id)).collect(),
            from_fallback: false,
        }
    }

    fn payments(rows: &[(&str, f64)]) -> GoalPayments {
        rows.iter()
            .map(|(id, amount)| (FamilyId::from(*id), *amount))
            .collect()
    }

    /// Accrual of every listed family, computed the way the engine does
    fn accrue_all(goal: &Goal, who: &[&str], paid: &[(&str, f64)], families: &[&str]) -> Vec<f64> {
        let mode = AccrualMode::parse(&goal.accrual_mode).unwrap();
        let participants = participants(who);
        let payments = payments(paid);
        let inputs = precompute(goal, mode, &participants, &payments);
        families
            .iter()
            .map(|f| accrue(&FamilyId::from(*f), goal, mode, &participants, &payments, inputs))
            .collect()
    }

    #[test]
    fn test_static_per_family_ignores_payments() {
        let goal = Goal::new("G1", AccrualMode::StaticPerFamily, 500.0);
        let accrued = accrue_all(
            &goal,
            &["F1", "F2", "F3"],
            &[("F1", 500.0), ("F2", 300.0)],
            &["F1", "F2", "F3"],
        );
        assert_eq!(accrued, vec![500.0, 500.0, 500.0]);
    }

    #[test]
    fn test_shared_total_by_payers() {
        let goal = Goal::new("G1", AccrualMode::SharedTotalByPayers, 1000.0);
        let accrued = accrue_all(
            &goal,
            &["F1", "F2", "F3"],
            &[("F1", 700.0), ("F2", 300.0)],
            &["F1", "F2", "F3"],
        );
        assert_eq!(accrued, vec![500.0, 500.0, 0.0]);
    }

    #[test]
    fn test_shared_total_all() {
        let goal = Goal::new("G1", AccrualMode::SharedTotalAll, 900.0);
        let accrued = accrue_all(&goal, &["F1", "F2", "F3"], &[], &["F1", "F2", "F3", "F4"]);
        assert_eq!(accrued, vec![300.0, 300.0, 300.0, 0.0]);
    }

    #[test]
    fn test_dynamic_by_payers() {
        let goal = Goal::new("G1", AccrualMode::DynamicByPayers, 500.0);
        let accrued = accrue_all(
            &goal,
            &["F1", "F2", "F3"],
            &[("F1", 2000.0), ("F2", 1333.0)],
            &["F1", "F2", "F3"],
        );
        assert_eq!(accrued, vec![250.0, 250.0, 0.0]);
    }

    #[test]
    fn test_dynamic_below_cap_pays_what_was_paid() {
        let goal = Goal::new("G1", AccrualMode::DynamicByPayers, 600.0);
        let accrued = accrue_all(
            &goal,
            &["F1", "F2", "F3"],
            &[("F1", 100.0), ("F2", 400.0), ("F3", 1000.0)],
            &["F1", "F2", "F3"],
        );
        assert_eq!(accrued, vec![100.0, 250.0, 250.0]);
    }

    #[test]
    fn test_proportional_by_payers() {
        let goal = Goal::new("G1", AccrualMode::ProportionalByPayers, 500.0);
        let accrued = accrue_all(
            &goal,
            &["F1", "F2"],
            &[("F1", 750.0), ("F2", 250.0)],
            &["F1", "F2"],
        );
        assert_eq!(accrued, vec![375.0, 125.0]);

        // under-collected goals consume everything paid
        let goal = Goal::new("G2", AccrualMode::ProportionalByPayers, 5000.0);
        let accrued = accrue_all(&goal, &["F1", "F2"], &[("F1", 750.0)], &["F1", "F2"]);
        assert_eq!(accrued, vec![750.0, 0.0]);
    }

    #[test]
    fn test_unit_price_charges_whole_units() {
        let goal = Goal::new("G1", AccrualMode::UnitPrice, 1000.0).with_fixed_cap(150.0);
        let accrued = accrue_all(
            &goal,
            &["F1", "F2"],
            &[("F1", 400.0), ("F2", 100.0)],
            &["F1", "F2"],
        );
        assert_eq!(accrued, vec![300.0, 0.0]);

        let unpriced = Goal::new("G2", AccrualMode::UnitPrice, 1000.0);
        let accrued = accrue_all(&unpriced, &["F1"], &[("F1", 400.0)], &["F1"]);
        assert_eq!(accrued, vec![0.0]);
    }

    #[test]
    fn test_voluntary_never_accrues() {
        let goal = Goal::new("G1", AccrualMode::Voluntary, 1000.0);
        let accrued = accrue_all(&goal, &["F1"], &[("F1", 400.0)], &["F1"]);
        assert_eq!(accrued, vec![0.0]);
    }

    #[test]
    fn test_from_balance_matches_shared_total_all() {
        let from_balance = Goal::new("G1", AccrualMode::FromBalance, 1000.0);
        let shared = Goal::new("G2", AccrualMode::SharedTotalAll, 1000.0);
        let who = ["F1", "F2", "F3", "F4"];
        assert_eq!(
            accrue_all(&from_balance, &who, &[], &who),
            accrue_all(&shared, &who, &[], &who)
        );
    }

    #[test]
    fn test_non_participant_accrues_nothing() {
        for mode in AccrualMode::ALL {
            let goal = Goal::new("G1", mode, 100.0).with_fixed_cap(10.0);
            let accrued = accrue_all(&goal, &["F1"], &[("F2", 500.0)], &["F2"]);
            assert_eq!(accrued, vec![0.0], "mode {}", mode);
        }
    }
}
