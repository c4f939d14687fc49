//! Accrual computation engine
//!
//! Pure functions over a snapshot: participant resolution, the water-filling
//! cap solver, goal precomputation, the per-mode accrual calculator and the
//! orchestrating engine. Nothing in here performs I/O or returns errors.

pub mod accrual;
pub mod aliases;
pub mod engine;
pub mod participants;
pub mod precompute;
pub mod solver;

pub use accrual::accrue;
pub use aliases::ModeAliases;
pub use engine::{
    AccrualEngine, BreakdownEntry, DetailRow, Explanation, FamilyBalance, GoalEvaluation,
};
pub use participants::{
    resolve_declared_participants, resolve_participants, with_payer_fallback, Participants,
};
pub use precompute::{precompute, GoalInputs};
pub use solver::solve_cap;
