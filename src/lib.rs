//! family-funds - shared family fund accruals
//!
//! This library computes how much each family owes toward shared collection
//! goals from families, goals, participation records and payments. All
//! amounts are plain `f64` values rounded at well-defined points.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Input data (families, goals, participation, payments, issue records, snapshot)
//! - `services`: Pure accrual engine (participants, cap solver, accrual modes)
//! - `reports`: Detail rows, family balances, goal summaries and issue status
//! - `storage`: JSON data directory and snapshot file providers
//! - `config`: Paths and user settings, including mode aliases
//! - `export`: CSV, JSON and YAML output
//! - `display`: Terminal tables and diagnostic views
//! - `cli`: Command handlers for the `funds` binary
//! - `logging`: `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use family_funds::models::{FamilyId, StatusFilter};
//! use family_funds::services::{AccrualEngine, ModeAliases};
//! use family_funds::storage::{JsonSnapshotStore, SnapshotProvider};
//!
//! let snapshot = JsonSnapshotStore::new(paths).load_snapshot()?;
//! let aliases = ModeAliases::default();
//! let engine = AccrualEngine::new(&snapshot, &aliases);
//! let owed = engine.compute_accrual(&FamilyId::from("F001"), StatusFilter::Open);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FundsError, FundsResult};
