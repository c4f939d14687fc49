//! Goal-wide scalar inputs
//!
//! The dynamic cap and the payer count are the same for every family of a
//! goal, so they are computed once per goal.

use tracing::debug;

use super::participants::Participants;
use super::solver::solve_cap;
use crate::models::{AccrualMode, Goal, GoalPayments};

/// Shared inputs for the accrual formulas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalInputs {
    /// Water-filling cap (dynamic mode only)
    pub cap: f64,
    /// Participants with a positive payment (shared-by-payers mode only)
    pub payer_count: usize,
}

/// Payments of participants who paid something
pub fn participant_payments(participants: &Participants, payments: &GoalPayments) -> Vec<f64> {
    participants
        .iter()
        .filter_map(|family_id| payments.get(family_id).copied())
        .filter(|paid| *paid > 0.0)
        .collect()
}

/// Compute the goal-wide inputs for `mode`
pub fn precompute(
    goal: &Goal,
    mode: AccrualMode,
    participants: &Participants,
    payments: &GoalPayments,
) -> GoalInputs {
    let inputs = match mode {
        AccrualMode::DynamicByPayers => {
            let cap = match goal.effective_fixed_cap() {
                Some(frozen) => frozen,
                None => solve_cap(goal.target(), &participant_payments(participants, payments)),
            };
            GoalInputs {
                cap,
                payer_count: 0,
            }
        }
        AccrualMode::SharedTotalByPayers => GoalInputs {
            cap: 0.0,
            payer_count: participant_payments(participants, payments).len(),
        },
        _ => GoalInputs::default(),
    };

    debug!(
        goal = %goal.id,
        mode = %mode,
        cap = inputs.cap,
        payer_count = inputs.payer_count,
        "precomputed goal inputs"
    );
    inputs
}
