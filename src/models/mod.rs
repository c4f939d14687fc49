//! Core data models for family-funds
//!
//! This module contains the data structures the accrual engine reads:
//! families, goals, participation records, payments, hand-out records and
//! the snapshot that bundles them.

pub mod family;
pub mod goal;
pub mod ids;
pub mod issue;
pub mod money;
pub mod participation;
pub mod payment;
pub mod period;
pub mod snapshot;

pub use family::Family;
pub use goal::{AccrualMode, Goal, GoalStatus, StatusFilter};
pub use ids::{FamilyId, GoalId};
pub use issue::{issued_units_by_goal, IssueRecord};
pub use money::{format_amount, round_money, round_solver_precision};
pub use participation::{
    ParticipationBucket, ParticipationIndex, ParticipationRecord, ParticipationStatus,
};
pub use payment::{GoalPayments, Payment, PaymentLedger};
pub use period::DateSpan;
pub use snapshot::Snapshot;
