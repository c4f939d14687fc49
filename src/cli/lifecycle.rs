//! Goal lifecycle commands
//!
//! Closing a dynamic goal freezes its current cap into `fixed_cap` so later
//! payments no longer move the accruals of a finished collection.

use tracing::info;

use super::{goal_arg, CliContext};
use crate::error::{FundsError, FundsResult};
use crate::models::{format_amount, Goal, GoalId};
use crate::services::AccrualEngine;

fn load_goal(context: &CliContext, goal_id: &GoalId) -> FundsResult<Goal> {
    context
        .store()?
        .find_goal(goal_id)?
        .ok_or_else(|| FundsError::goal_not_found(goal_id.as_str()))
}

/// Close an open goal
pub fn handle_close_command(context: &CliContext, goal: &str) -> FundsResult<()> {
    let goal_id = goal_arg(goal)?;
    let snapshot = context.load_snapshot()?;
    let engine = AccrualEngine::new(&snapshot, &context.aliases);

    let current = load_goal(context, &goal_id)?;
    let frozen_cap = engine.freeze_cap(&goal_id).filter(|cap| *cap > 0.0);
    let closed = current.close(frozen_cap)?;
    context.store()?.update_goal(closed)?;

    info!(goal = %goal_id, frozen_cap = ?frozen_cap, "Goal closed");
    println!("Closed goal: {}", goal_id);
    if let Some(cap) = frozen_cap {
        println!(
            "  Frozen cap: {}",
            format_amount(cap, context.currency_symbol())
        );
    }
    Ok(())
}

/// Cancel an open goal; its accruals drop out of every report
pub fn handle_cancel_command(context: &CliContext, goal: &str) -> FundsResult<()> {
    let goal_id = goal_arg(goal)?;
    let cancelled = load_goal(context, &goal_id)?.cancel()?;
    context.store()?.update_goal(cancelled)?;

    info!(goal = %goal_id, "Goal cancelled");
    println!("Cancelled goal: {}", goal_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FundsPaths, Settings};
    use crate::models::{AccrualMode, GoalStatus, Payment, Snapshot};
    use crate::storage::{initialize_storage, write_json_atomic, SnapshotProvider};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_context(temp_dir: &TempDir) -> CliContext {
        let paths = FundsPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        CliContext::new(paths, Settings::default(), None)
    }

    fn write_snapshot(context: &CliContext, snapshot: &Snapshot) {
        let paths = &context.paths;
        write_json_atomic(paths.goals_file(), &json!({ "goals": snapshot.goals })).unwrap();
        write_json_atomic(paths.payments_file(), &json!({ "payments": snapshot.payments })).unwrap();
    }

    #[test]
    fn test_close_freezes_dynamic_cap() {
        let temp_dir = TempDir::new().unwrap();
        let context = create_test_context(&temp_dir);
        write_snapshot(
            &context,
            &Snapshot {
                goals: vec![Goal::new("G1", AccrualMode::DynamicByPayers, 500.0)],
                payments: vec![
                    Payment::to_goal("F1", "G1", 100.0),
                    Payment::to_goal("F2", "G1", 200.0),
                    Payment::to_goal("F3", "G1", 300.0),
                ],
                ..Snapshot::default()
            },
        );

        handle_close_command(&context, "G1").unwrap();

        let snapshot = context.load_snapshot().unwrap();
        let goal = snapshot.goal(&GoalId::from("G1")).unwrap();
        assert_eq!(goal.status, GoalStatus::Closed);
        assert_eq!(goal.fixed_cap, Some(200.0));
    }

    #[test]
    fn test_close_twice_is_invalid_transition() {
        let temp_dir = TempDir::new().unwrap();
        let context = create_test_context(&temp_dir);
        write_snapshot(
            &context,
            &Snapshot {
                goals: vec![Goal::new("G1", AccrualMode::StaticPerFamily, 50.0)],
                ..Snapshot::default()
            },
        );

        handle_close_command(&context, "G1").unwrap();
        let err = handle_close_command(&context, "G1").unwrap_err();
        assert!(matches!(err, FundsError::InvalidTransition { .. }));
    }

    #[test]
    fn test_cancel_missing_goal() {
        let temp_dir = TempDir::new().unwrap();
        let context = create_test_context(&temp_dir);

        let err = handle_cancel_command(&context, "G404").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cancel_keeps_other_fields() {
        let temp_dir = TempDir::new().unwrap();
        let context = create_test_context(&temp_dir);
        write_snapshot(
            &context,
            &Snapshot {
                goals: vec![Goal::new("G1", AccrualMode::UnitPrice, 100.0).with_fixed_cap(25.0)],
                ..Snapshot::default()
            },
        );

        handle_cancel_command(&context, "G1").unwrap();

        let store = context.store().unwrap();
        let snapshot = store.load_snapshot().unwrap();
        let goal = &snapshot.goals[0];
        assert_eq!(goal.status, GoalStatus::Cancelled);
        assert_eq!(goal.fixed_cap, Some(25.0));
        assert_eq!(goal.accrual_mode, "unit_price");
    }
}
